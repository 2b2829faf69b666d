//! Parsing, mutation, and serialization of project.pbxproj manifests
//!
//! A registration touches three correlated tables: the PBXBuildFile section,
//! the PBXFileReference section, and the `files = ( ... );` membership list
//! inside the PBXSourcesBuildPhase block. [`ProjectManifest`] holds the
//! document as four verbatim segments split at the three insertion points,
//! plus an ordered list of typed pending entries per table. Everything
//! outside the insertion points is rendered back byte-for-byte, so the host
//! build tool keeps accepting the file.

use std::fmt;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

use regex::Regex;

use crate::models::{FileDescriptor, SourceFileType};

pub const BUILD_FILE_SECTION: &str = "PBXBuildFile";
pub const FILE_REFERENCE_SECTION: &str = "PBXFileReference";
pub const SOURCES_PHASE_SECTION: &str = "PBXSourcesBuildPhase";

/// Fatal manifest errors
///
/// Duplicate files are not an error: they are filtered out per file and
/// reported, never aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Could not find the {0} section")]
    SectionNotFound(String),

    #[error("Could not find the files list in the PBXSourcesBuildPhase section")]
    MembershipListNotFound,

    #[error("Failed to write manifest to {path}: {source}")]
    WriteFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Record linking a source file to the Sources build phase
#[derive(Debug, Clone)]
pub struct BuildFileEntry {
    pub id: String,
    pub file_ref: String,
    pub name: String,
}

impl fmt::Display for BuildFileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\t\t{} /* {} in Sources */ = {{isa = PBXBuildFile; fileRef = {} /* {} */; }};",
            self.id, self.name, self.file_ref, self.name
        )
    }
}

/// Record describing a file's location and type
#[derive(Debug, Clone)]
pub struct FileReferenceEntry {
    pub id: String,
    pub file_type: SourceFileType,
    pub name: String,
}

impl fmt::Display for FileReferenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\t\t{} /* {} */ = {{isa = PBXFileReference; lastKnownFileType = {}; path = {}; sourceTree = \"<group>\"; }};",
            self.id, self.name, self.file_type, self.name
        )
    }
}

/// Record declaring that a build-file entry participates in the Sources phase
#[derive(Debug, Clone)]
pub struct MembershipLine {
    pub build_file: String,
    pub name: String,
}

impl fmt::Display for MembershipLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\t\t\t\t{} /* {} in Sources */,", self.build_file, self.name)
    }
}

/// A parsed manifest: verbatim surrounding text plus pending typed entries
#[derive(Debug)]
pub struct ProjectManifest {
    // Verbatim document pieces, in order: up to the PBXBuildFile insertion
    // point, then up to the PBXFileReference insertion point, then up to the
    // membership list insertion point, then the rest.
    head: String,
    middle: String,
    lower: String,
    tail: String,

    build_files: Vec<BuildFileEntry>,
    file_refs: Vec<FileReferenceEntry>,
    memberships: Vec<MembershipLine>,

    // Basenames already present in the file-reference table, plus basenames
    // accepted earlier in this batch.
    registered: Vec<String>,
}

impl ProjectManifest {
    /// Parse manifest text. Fails before any mutation if a required section
    /// or the membership list cannot be located.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let build = section_body(text, BUILD_FILE_SECTION)?;
        let refs = section_body(text, FILE_REFERENCE_SECTION)?;
        let phase = section_body(text, SOURCES_PHASE_SECTION)?;

        let build_insert = line_start(text, build.end);
        let refs_insert = line_start(text, refs.end);
        let membership_insert = membership_close(text, &phase)?;

        // pbxproj emits sections in a fixed order; anything else means the
        // document is not one we can splice safely.
        if build_insert > refs_insert || refs_insert > membership_insert {
            return Err(ManifestError::SectionNotFound(
                FILE_REFERENCE_SECTION.to_string(),
            ));
        }

        let registered = registered_basenames(&text[refs]);

        Ok(Self {
            head: text[..build_insert].to_string(),
            middle: text[build_insert..refs_insert].to_string(),
            lower: text[refs_insert..membership_insert].to_string(),
            tail: text[membership_insert..].to_string(),
            build_files: Vec::new(),
            file_refs: Vec::new(),
            memberships: Vec::new(),
            registered,
        })
    }

    /// True if a file with this basename is already in the file-reference
    /// table or was accepted earlier in this batch. Matching is by basename
    /// only, not full path.
    pub fn is_registered(&self, basename: &str) -> bool {
        self.registered.iter().any(|b| b == basename)
    }

    /// Queue one accepted file: exactly one entry per table.
    pub fn register(&mut self, desc: &FileDescriptor, file_ref_id: String, build_file_id: String) {
        let name = desc.basename().to_string();
        self.build_files.push(BuildFileEntry {
            id: build_file_id.clone(),
            file_ref: file_ref_id.clone(),
            name: name.clone(),
        });
        self.file_refs.push(FileReferenceEntry {
            id: file_ref_id,
            file_type: desc.file_type(),
            name: name.clone(),
        });
        self.memberships.push(MembershipLine {
            build_file: build_file_id,
            name: name.clone(),
        });
        self.registered.push(name);
    }

    /// Number of files queued for insertion
    pub fn pending(&self) -> usize {
        self.build_files.len()
    }

    /// Serialize back to manifest text. Pending entries land immediately
    /// before their table's closing line, one per line, tab-indented like the
    /// surrounding records.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.head.len() + self.middle.len() + self.lower.len() + self.tail.len() + 256,
        );
        out.push_str(&self.head);
        for entry in &self.build_files {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out.push_str(&self.middle);
        for entry in &self.file_refs {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out.push_str(&self.lower);
        for line in &self.memberships {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out.push_str(&self.tail);
        out
    }

    /// Render and atomically replace the file at `path`: the text goes to a
    /// temp file in the same directory first, then renames over the original,
    /// so a failed write never leaves a truncated manifest behind.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let rendered = self.render();
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| Path::new("."));
        write_atomic(dir, path, rendered.as_bytes()).map_err(|source| {
            ManifestError::WriteFailure {
                path: path.display().to_string(),
                source,
            }
        })
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Byte range of the text between a section's begin and end markers
fn section_body(text: &str, name: &str) -> Result<Range<usize>, ManifestError> {
    let begin = format!("/* Begin {} section */", name);
    let end = format!("/* End {} section */", name);
    let begin_at = text
        .find(&begin)
        .ok_or_else(|| ManifestError::SectionNotFound(name.to_string()))?;
    let body_start = begin_at + begin.len();
    let end_at = text[body_start..]
        .find(&end)
        .ok_or_else(|| ManifestError::SectionNotFound(name.to_string()))?;
    Ok(body_start..body_start + end_at)
}

/// Insertion point for membership lines: the start of the line holding the
/// `);` that closes the `files = (` list inside the sources phase body.
fn membership_close(text: &str, phase: &Range<usize>) -> Result<usize, ManifestError> {
    let body = &text[phase.clone()];
    let files_at = body
        .find("files = (")
        .ok_or(ManifestError::MembershipListNotFound)?;
    let close_at = body[files_at..]
        .find(");")
        .ok_or(ManifestError::MembershipListNotFound)?;
    Ok(line_start(text, phase.start + files_at + close_at))
}

/// Start of the line containing `pos`
fn line_start(text: &str, pos: usize) -> usize {
    match text[..pos].rfind('\n') {
        Some(nl) => nl + 1,
        None => 0,
    }
}

/// Basenames of every `path = ...;` value in the file-reference section body
fn registered_basenames(body: &str) -> Vec<String> {
    let re = Regex::new(r#"path = "?([^";]+)"?;"#).unwrap();
    re.captures_iter(body)
        .map(|caps| {
            let path = caps[1].trim();
            path.rsplit('/').next().unwrap_or(path).to_string()
        })
        .collect()
}
