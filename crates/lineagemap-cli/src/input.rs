//! Input handling for file reading and stdin support.

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::PathBuf;

/// A chunk of source code and where it came from.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// Read source code from files or stdin.
///
/// If no files are provided, reads from stdin.
pub fn read_input(files: &[PathBuf]) -> Result<Vec<SourceFile>> {
    if files.is_empty() {
        read_from_stdin()
    } else {
        read_from_files(files)
    }
}

/// Joins sources into the single snippet sent for analysis.
///
/// Files are kept in the order given, separated by a blank line.
pub fn combine(sources: &[SourceFile]) -> String {
    sources
        .iter()
        .map(|source| source.content.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn read_from_stdin() -> Result<Vec<SourceFile>> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    Ok(vec![SourceFile {
        name: "<stdin>".to_string(),
        content,
    }])
}

fn read_from_files(files: &[PathBuf]) -> Result<Vec<SourceFile>> {
    files
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;

            Ok(SourceFile {
                name: path.display().to_string(),
                content,
            })
        })
        .collect()
}
