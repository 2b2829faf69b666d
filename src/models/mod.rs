//! Data models for file registration
//!
//! A registration request is a list of [`FileDescriptor`]s; each accepted
//! descriptor lands in the manifest as one record per table.

use serde::Deserialize;

/// A source file requested for registration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Path relative to the project root, e.g. "Models/HealthEvent.swift"
    pub path: String,

    /// Flat group label, e.g. "Models"
    #[serde(default)]
    pub group: String,
}

impl FileDescriptor {
    pub fn new(path: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            group: group.into(),
        }
    }

    /// Final path component. Duplicate detection and display names both key
    /// on the basename, not the full path.
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn file_type(&self) -> SourceFileType {
        SourceFileType::from_path(&self.path)
    }
}

impl std::str::FromStr for FileDescriptor {
    type Err = String;

    /// Parses "PATH[:GROUP]"; a missing group falls back to the parent
    /// directory name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, group) = match s.split_once(':') {
            Some((p, _)) if p.is_empty() => {
                return Err(format!("Invalid descriptor: {}. Use: PATH[:GROUP]", s));
            }
            Some((p, g)) if !g.is_empty() => (p.to_string(), g.to_string()),
            Some((p, _)) => (p.to_string(), parent_dir_name(p)),
            None if s.is_empty() => {
                return Err("Empty file descriptor. Use: PATH[:GROUP]".to_string());
            }
            None => (s.to_string(), parent_dir_name(s)),
        };
        Ok(FileDescriptor { path, group })
    }
}

fn parent_dir_name(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir.rsplit('/').next().unwrap_or(dir).to_string(),
        None => String::new(),
    }
}

/// Xcode lastKnownFileType tag, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFileType {
    Swift,
    ObjC,
    ObjCpp,
    C,
    Cpp,
    CHeader,
    CppHeader,
    Metal,
    Text,
}

impl SourceFileType {
    pub fn from_path(path: &str) -> Self {
        let ext = match path.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        };
        match ext.as_str() {
            "swift" => SourceFileType::Swift,
            "m" => SourceFileType::ObjC,
            "mm" => SourceFileType::ObjCpp,
            "c" => SourceFileType::C,
            "cc" | "cpp" | "cxx" => SourceFileType::Cpp,
            "h" => SourceFileType::CHeader,
            "hh" | "hpp" => SourceFileType::CppHeader,
            "metal" => SourceFileType::Metal,
            _ => SourceFileType::Text,
        }
    }
}

impl std::fmt::Display for SourceFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFileType::Swift => write!(f, "sourcecode.swift"),
            SourceFileType::ObjC => write!(f, "sourcecode.c.objc"),
            SourceFileType::ObjCpp => write!(f, "sourcecode.cpp.objcpp"),
            SourceFileType::C => write!(f, "sourcecode.c.c"),
            SourceFileType::Cpp => write!(f, "sourcecode.cpp.cpp"),
            SourceFileType::CHeader => write!(f, "sourcecode.c.h"),
            SourceFileType::CppHeader => write!(f, "sourcecode.cpp.h"),
            SourceFileType::Metal => write!(f, "sourcecode.metal"),
            SourceFileType::Text => write!(f, "text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_with_explicit_group() {
        let d: FileDescriptor = "Models/HealthEvent.swift:Models".parse().unwrap();
        assert_eq!(d.path, "Models/HealthEvent.swift");
        assert_eq!(d.group, "Models");
        assert_eq!(d.basename(), "HealthEvent.swift");
    }

    #[test]
    fn descriptor_group_defaults_to_parent_dir() {
        let d: FileDescriptor = "Views/HealthEvent/AddHealthEventView.swift"
            .parse()
            .unwrap();
        assert_eq!(d.group, "HealthEvent");
        assert_eq!(d.basename(), "AddHealthEventView.swift");
    }

    #[test]
    fn top_level_descriptor_has_empty_group() {
        let d: FileDescriptor = "main.swift".parse().unwrap();
        assert_eq!(d.group, "");
        assert_eq!(d.basename(), "main.swift");
    }

    #[test]
    fn empty_descriptor_rejected() {
        assert!("".parse::<FileDescriptor>().is_err());
        assert!(":Models".parse::<FileDescriptor>().is_err());
    }

    #[test]
    fn file_type_from_extension() {
        assert_eq!(SourceFileType::from_path("A.swift"), SourceFileType::Swift);
        assert_eq!(SourceFileType::from_path("b/c.m"), SourceFileType::ObjC);
        assert_eq!(SourceFileType::from_path("d.cpp"), SourceFileType::Cpp);
        assert_eq!(SourceFileType::from_path("d.CXX"), SourceFileType::Cpp);
        assert_eq!(SourceFileType::from_path("e.h"), SourceFileType::CHeader);
        assert_eq!(
            SourceFileType::from_path("Shaders.metal"),
            SourceFileType::Metal
        );
        assert_eq!(SourceFileType::from_path("README"), SourceFileType::Text);
    }

    #[test]
    fn file_type_tags() {
        assert_eq!(SourceFileType::Swift.to_string(), "sourcecode.swift");
        assert_eq!(SourceFileType::ObjCpp.to_string(), "sourcecode.cpp.objcpp");
        assert_eq!(SourceFileType::Text.to_string(), "text");
    }

    #[test]
    fn descriptor_list_from_json() {
        let json = r#"[{"path": "Models/HealthEvent.swift", "group": "Models"},
                       {"path": "Utils/HealthEventTestData.swift"}]"#;
        let list: Vec<FileDescriptor> = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].group, "Models");
        assert_eq!(list[1].group, "");
    }
}
