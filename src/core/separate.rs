use crate::adapters::storage::LocalStorage;
use crate::core::fasta::{file_name, file_stem, list_regular_files, parse_fasta, render_fasta};
use crate::domain::model::{FastaRecord, TaskReport};
use crate::domain::ports::{Storage, Task};
use crate::utils::error::{FoldError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Splits a colon-joined complex into one record per chain, named
/// `{header}_seq1`, `{header}_seq2`, ...
pub fn split_complex(header: &str, sequence: &str) -> Option<Vec<FastaRecord>> {
    let chains: Vec<&str> = sequence.split(':').collect();
    if chains.len() < 2 {
        return None;
    }

    Some(
        chains
            .into_iter()
            .enumerate()
            .map(|(i, chain)| FastaRecord::new(format!("{}_seq{}", header, i + 1), chain))
            .collect(),
    )
}

pub fn separated_file_name(path: &Path) -> String {
    format!("{}_separated.fasta", file_stem(path))
}

pub struct SeparateTask {
    input: LocalStorage,
    output: LocalStorage,
}

impl SeparateTask {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: LocalStorage::new(input_dir),
            output: LocalStorage::new(output_dir),
        }
    }

    async fn process_file(&self, path: &Path, report: &mut TaskReport) -> Result<()> {
        let name = file_name(path);
        let data = self.input.read_file(&name).await?;
        let content = String::from_utf8(data).map_err(|e| FoldError::FastaFormatError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let looks_like_fasta = content
            .lines()
            .next()
            .map(|line| line.starts_with('>'))
            .unwrap_or(false);
        if !looks_like_fasta {
            tracing::warn!(
                "Skipping '{}' as it doesn't appear to be a FASTA file.",
                name
            );
            report.skipped += 1;
            return Ok(());
        }

        let parsed = parse_fasta(&content);
        let Some(first) = parsed.records.first() else {
            report.skipped += 1;
            return Ok(());
        };

        let Some(chains) = split_complex(&first.header, &first.sequence) else {
            tracing::warn!(
                "Could not find colon-separated sequences in '{}'. Skipping.",
                name
            );
            report.skipped += 1;
            return Ok(());
        };

        let output_name = separated_file_name(path);
        self.output
            .write_file(&output_name, render_fasta(&chains, None).as_bytes())
            .await?;
        tracing::info!("Successfully processed '{}' -> '{}'", name, output_name);
        report.record_output(self.output.resolve(&output_name));
        Ok(())
    }
}

#[async_trait]
impl Task for SeparateTask {
    fn name(&self) -> &str {
        "separate"
    }

    async fn run(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new(self.name());

        if !self.output.base_path().exists() {
            tokio::fs::create_dir_all(self.output.base_path()).await?;
            tracing::info!(
                "Created output directory: {}",
                self.output.base_path().display()
            );
        }

        for path in list_regular_files(self.input.base_path())? {
            if let Err(e) = self.process_file(&path, &mut report).await {
                tracing::error!("Error processing file {}: {}", path.display(), e);
                report.failed += 1;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_two_chains() {
        let records = split_complex("TIMP3+MMP2", "CTCS:MEAL").unwrap();
        assert_eq!(
            records,
            vec![
                FastaRecord::new("TIMP3+MMP2_seq1", "CTCS"),
                FastaRecord::new("TIMP3+MMP2_seq2", "MEAL"),
            ]
        );
    }

    #[test]
    fn test_split_three_chains() {
        let records = split_complex("abc", "AA:CC:DD").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].header, "abc_seq3");
    }

    #[test]
    fn test_split_without_colon() {
        assert!(split_complex("mono", "CTCSPSHPQD").is_none());
    }

    #[test]
    fn test_separated_file_name() {
        assert_eq!(
            separated_file_name(Path::new("in/complex_TIMP3_v_MMP2_C_WT.fasta")),
            "complex_TIMP3_v_MMP2_C_WT_separated.fasta"
        );
    }
}
