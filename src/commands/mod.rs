//! The register command: load, mutate, save
//!
//! Composed as three stages over [`ProjectManifest`]. Locator failures abort
//! before any mutation; a batch where every file is a duplicate exits cleanly
//! without rewriting the manifest.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ids::IdGenerator;
use crate::manifest::ProjectManifest;
use crate::models::FileDescriptor;

/// Outcome of one registration run, keyed by basename
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

/// Register the given descriptors into the manifest at `manifest_path`.
///
/// Already-registered basenames are skipped and reported per file; they never
/// abort the run. Each accepted file gets two fresh identifiers and exactly
/// one entry in each of the three tables.
pub fn register(manifest_path: &Path, descriptors: &[FileDescriptor]) -> Result<RegisterSummary> {
    let text = fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
    let mut manifest = ProjectManifest::parse(&text)?;

    let mut ids = IdGenerator::new();
    let mut summary = RegisterSummary::default();

    for desc in descriptors {
        let name = desc.basename();
        if manifest.is_registered(name) {
            println!("  {} already present, skipping", name);
            summary.skipped.push(name.to_string());
            continue;
        }

        let file_ref_id = ids.next_id();
        let build_file_id = ids.next_id();
        manifest.register(desc, file_ref_id, build_file_id);

        if desc.group.is_empty() {
            println!("  Added {}", name);
        } else {
            println!("  Added {} ({})", name, desc.group);
        }
        summary.added.push(name.to_string());
    }

    if manifest.pending() == 0 {
        println!("All requested files are already registered; manifest unchanged.");
        return Ok(summary);
    }

    manifest.save(manifest_path)?;

    println!();
    println!(
        "Added {} file(s) to {}",
        summary.added.len(),
        manifest_path.display()
    );

    Ok(summary)
}
