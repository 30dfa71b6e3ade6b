use crate::adapters::storage::LocalStorage;
use crate::core::fasta::{
    decode_fasta, file_name, list_fasta_files, render_fasta, DEFAULT_LINE_WIDTH,
};
use crate::domain::model::{FastaFile, TaskReport};
use crate::domain::ports::{Storage, Task};
use crate::utils::error::Result;
use crate::utils::validation::validate_residues;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub const COMPLEX_PREFIX: &str = "complex_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced(FastaFile),
    Skipped(String),
}

/// Swaps the second protein of a pair (or colon-joined complex) for `replacement`.
/// Headers are never rewritten, and chains after the second are kept.
pub fn replace_second_chain(
    mut file: FastaFile,
    file_name: &str,
    replacement: &str,
) -> ReplaceOutcome {
    let is_complex = file_name.starts_with(COMPLEX_PREFIX);

    if is_complex && file.len() == 1 {
        let record = &mut file.records[0];
        let mut chains: Vec<&str> = record.sequence.split(':').collect();
        if chains.len() < 2 {
            return ReplaceOutcome::Skipped(format!(
                "{} has a single record without ':' separated chains",
                file_name
            ));
        }
        chains[1] = replacement;
        record.sequence = chains.join(":");
        return ReplaceOutcome::Replaced(file);
    }

    if file.len() < 2 {
        return ReplaceOutcome::Skipped(format!("{} has less than two sequences", file_name));
    }

    let second = &mut file.records[1];
    if is_complex && !second.header.contains(':') {
        tracing::warn!(
            "'{}' file {} does not have a ':' in the second header. \
             Replacing the whole second sequence.",
            COMPLEX_PREFIX,
            file_name
        );
    }
    second.sequence = replacement.to_string();
    ReplaceOutcome::Replaced(file)
}

pub struct ReplaceTask {
    input: LocalStorage,
    output: LocalStorage,
    replacement: String,
    wrap: Option<usize>,
}

impl ReplaceTask {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        replacement: &str,
    ) -> Result<Self> {
        let replacement = validate_residues("replacement_sequence", replacement)?;
        Ok(Self {
            input: LocalStorage::new(input_dir),
            output: LocalStorage::new(output_dir),
            replacement,
            wrap: Some(DEFAULT_LINE_WIDTH),
        })
    }

    pub fn with_wrap(mut self, wrap: Option<usize>) -> Self {
        self.wrap = wrap;
        self
    }

    async fn process_file(&self, path: &Path, report: &mut TaskReport) -> Result<()> {
        let name = file_name(path);
        tracing::info!("Processing: {}", name);

        let data = self.input.read_file(&name).await?;
        let parsed = decode_fasta(path, data)?;

        match replace_second_chain(parsed, &name, &self.replacement) {
            ReplaceOutcome::Replaced(modified) => {
                let rendered = render_fasta(&modified.records, self.wrap);
                self.output.write_file(&name, rendered.as_bytes()).await?;
                let output_path = self.output.resolve(&name);
                tracing::info!("  Wrote modified file to: {}", output_path.display());
                report.record_output(output_path);
            }
            ReplaceOutcome::Skipped(reason) => {
                tracing::warn!("  Skipping: {}", reason);
                report.skipped += 1;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Task for ReplaceTask {
    fn name(&self) -> &str {
        "replace"
    }

    async fn run(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new(self.name());
        tokio::fs::create_dir_all(self.output.base_path()).await?;

        let fasta_files = list_fasta_files(self.input.base_path())?;
        if fasta_files.is_empty() {
            tracing::warn!(
                "No FASTA files found in {}. Please check the path and file extensions.",
                self.input.base_path().display()
            );
            return Ok(report);
        }

        for path in &fasta_files {
            if let Err(e) = self.process_file(path, &mut report).await {
                tracing::error!("Error processing {}: {}", path.display(), e);
                report.failed += 1;
            }
        }

        Ok(report)
    }
}
