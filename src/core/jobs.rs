//! AlphaFold Server batch job generation.
//!
//! Each FASTA file becomes one job named after the file stem, with one
//! `proteinChain` entity per record. The output is the JSON array accepted by
//! the server's batch upload.

use crate::adapters::storage::LocalStorage;
use crate::core::fasta::{decode_fasta, file_name, file_stem, list_fasta_files};
use crate::domain::model::{FastaFile, TaskReport};
use crate::domain::ports::{Storage, Task};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldJob {
    pub name: String,
    pub sequences: Vec<JobEntity>,
    pub model_seeds: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobEntity {
    #[serde(rename = "proteinChain")]
    ProteinChain(ProteinChain),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinChain {
    pub sequence: String,
    pub count: u32,
}

pub fn fasta_to_job(name: &str, file: &FastaFile, collapse_identical: bool) -> FoldJob {
    let mut chains: Vec<ProteinChain> = Vec::new();

    for record in &file.records {
        if collapse_identical {
            if let Some(existing) = chains.iter_mut().find(|c| c.sequence == record.sequence) {
                existing.count += 1;
                continue;
            }
        }
        chains.push(ProteinChain {
            sequence: record.sequence.clone(),
            count: 1,
        });
    }

    FoldJob {
        name: name.to_string(),
        sequences: chains.into_iter().map(JobEntity::ProteinChain).collect(),
        model_seeds: Vec::new(),
    }
}

/// `alphafold_jobs.json` → `alphafold_jobs_3.json`
pub fn chunk_file_name(output: &Path, index: usize) -> String {
    let stem = file_stem(output);
    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, index, ext),
        None => format!("{}_{}", stem, index),
    }
}

pub struct JobsTask {
    input: LocalStorage,
    output: PathBuf,
    model_seeds: Vec<String>,
    collapse_identical: bool,
    max_jobs_per_file: Option<usize>,
}

impl JobsTask {
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: LocalStorage::new(input_dir),
            output: output.into(),
            model_seeds: Vec::new(),
            collapse_identical: false,
            max_jobs_per_file: None,
        }
    }

    pub fn with_model_seeds(mut self, seeds: Vec<String>) -> Self {
        self.model_seeds = seeds;
        self
    }

    pub fn with_collapse_identical(mut self, collapse: bool) -> Self {
        self.collapse_identical = collapse;
        self
    }

    pub fn with_max_jobs_per_file(mut self, max: Option<usize>) -> Self {
        self.max_jobs_per_file = max.filter(|m| *m > 0);
        self
    }

    async fn load_job(&self, path: &Path) -> Result<Option<FoldJob>> {
        let data = self.input.read_file(&file_name(path)).await?;
        let parsed = decode_fasta(path, data)?;
        if parsed.is_empty() {
            return Ok(None);
        }

        let mut job = fasta_to_job(&file_stem(path), &parsed, self.collapse_identical);
        job.model_seeds = self.model_seeds.clone();
        Ok(Some(job))
    }

    async fn write_jobs(&self, jobs: &[FoldJob], report: &mut TaskReport) -> Result<()> {
        let parent = self
            .output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let storage = LocalStorage::new(parent);

        let chunks: Vec<&[FoldJob]> = match self.max_jobs_per_file {
            Some(max) if jobs.len() > max => jobs.chunks(max).collect(),
            _ => vec![jobs],
        };
        let split = chunks.len() > 1;

        for (i, chunk) in chunks.into_iter().enumerate() {
            let name = if split {
                chunk_file_name(&self.output, i + 1)
            } else {
                file_name(&self.output)
            };
            let json = serde_json::to_string_pretty(chunk)?;
            storage.write_file(&name, json.as_bytes()).await?;
            tracing::info!("Wrote {} jobs to {}", chunk.len(), storage.resolve(&name).display());
            report.outputs.push(storage.resolve(&name));
        }
        Ok(())
    }
}

#[async_trait]
impl Task for JobsTask {
    fn name(&self) -> &str {
        "jobs"
    }

    async fn run(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new(self.name());

        let fasta_files = list_fasta_files(self.input.base_path())?;
        if fasta_files.is_empty() {
            tracing::warn!("No FASTA files found in {}", self.input.base_path().display());
            return Ok(report);
        }

        let mut jobs = Vec::new();
        for path in &fasta_files {
            match self.load_job(path).await {
                Ok(Some(job)) => {
                    tracing::info!(
                        "Added job for {} ({} sequences)",
                        file_name(path),
                        job.sequences.len()
                    );
                    jobs.push(job);
                    report.processed += 1;
                }
                Ok(None) => {
                    tracing::warn!("Skipping {}: no FASTA records", file_name(path));
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::error!("Error reading {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }

        if jobs.is_empty() {
            tracing::warn!("No jobs generated, nothing written");
            return Ok(report);
        }

        self.write_jobs(&jobs, &mut report).await?;
        Ok(report)
    }
}
