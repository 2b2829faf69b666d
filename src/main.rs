//! pbxadd - register source files into an Xcode project manifest

mod commands;
mod ids;
mod manifest;
mod models;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use models::FileDescriptor;

#[derive(Parser)]
#[command(name = "pbxadd")]
#[command(
    author,
    version,
    about = "Register source files into an Xcode project.pbxproj manifest"
)]
struct Cli {
    /// Path to the project.pbxproj manifest
    manifest: PathBuf,

    /// Files to register, as PATH[:GROUP] (group defaults to the parent directory name)
    files: Vec<String>,

    /// JSON descriptor file: [{"path": "...", "group": "..."}, ...] ("-" reads stdin)
    #[arg(short, long)]
    list: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut descriptors: Vec<FileDescriptor> = Vec::new();
    for raw in &cli.files {
        let desc = raw
            .parse::<FileDescriptor>()
            .map_err(|e| anyhow::anyhow!(e))?;
        descriptors.push(desc);
    }
    if let Some(list) = &cli.list {
        descriptors.extend(read_descriptor_list(list)?);
    }
    if descriptors.is_empty() {
        bail!("No files given. Pass PATH[:GROUP] arguments or --list <file>.");
    }

    commands::register(&cli.manifest, &descriptors)?;

    Ok(())
}

fn read_descriptor_list(source: &str) -> Result<Vec<FileDescriptor>> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read descriptor list from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read descriptor list {}", source))?
    };
    serde_json::from_str(&content).context("Failed to parse descriptor list JSON")
}
