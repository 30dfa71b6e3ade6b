//! FASTA reading, rendering and directory scanning shared by every task.

use crate::domain::model::{FastaFile, FastaRecord};
use crate::utils::error::{FoldError, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_LINE_WIDTH: usize = 60;

pub const FASTA_EXTENSIONS: [&str; 2] = ["fasta", "fa"];

/// Parses FASTA text. Lines are trimmed, blank lines skipped, and sequence
/// lines before the first header are dropped.
pub fn parse_fasta(content: &str) -> FastaFile {
    let mut records = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(FastaRecord::new(header.trim(), String::new()));
        } else if let Some(record) = current.as_mut() {
            record.sequence.push_str(line);
        }
    }

    if let Some(record) = current {
        records.push(record);
    }

    FastaFile { records }
}

pub fn decode_fasta(path: &Path, data: Vec<u8>) -> Result<FastaFile> {
    let content = String::from_utf8(data).map_err(|e| FoldError::FastaFormatError {
        path: path.display().to_string(),
        message: format!("not valid UTF-8: {}", e),
    })?;
    Ok(parse_fasta(&content))
}

pub fn read_fasta(path: &Path) -> Result<FastaFile> {
    let data = std::fs::read(path)?;
    decode_fasta(path, data)
}

/// Renders records back to FASTA text. `wrap` of `None` keeps each sequence
/// on a single line (AlphaFold-friendly).
pub fn render_fasta(records: &[FastaRecord], wrap: Option<usize>) -> String {
    let mut out = String::new();

    for record in records {
        out.push('>');
        out.push_str(&record.header);
        out.push('\n');

        match wrap {
            Some(width) if width > 0 => {
                let residues: Vec<char> = record.sequence.chars().collect();
                for chunk in residues.chunks(width) {
                    out.extend(chunk);
                    out.push('\n');
                }
            }
            _ => {
                out.push_str(&record.sequence);
                out.push('\n');
            }
        }
    }

    out
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

pub fn list_regular_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    Ok(list_regular_files(dir)?
        .into_iter()
        .filter(|p| has_extension(p, &[extension]))
        .collect())
}

pub fn list_fasta_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_regular_files(dir)?
        .into_iter()
        .filter(|p| has_extension(p, &FASTA_EXTENSIONS))
        .collect())
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
