//! Confidence metrics from AlphaFold Server result archives.

use crate::core::fasta::{file_name, list_files};
use crate::domain::model::TaskReport;
use crate::domain::ports::Task;
use crate::utils::error::{FoldError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

const SUMMARY_ENTRY_PATTERN: &str = r"summary_confidences_(\d+)\.json$";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryConfidences {
    pub iptm: Option<f64>,
    pub ptm: Option<f64>,
    pub ranking_score: Option<f64>,
    pub fraction_disordered: Option<f64>,
    // 伺服器版本不同，可能是 bool 或 0.0/1.0
    pub has_clash: Option<serde_json::Value>,
}

impl SummaryConfidences {
    pub fn clash(&self) -> Option<bool> {
        match self.has_clash.as_ref()? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub archive: String,
    pub model: u32,
    pub iptm: Option<f64>,
    pub ptm: Option<f64>,
    pub ranking_score: Option<f64>,
    pub fraction_disordered: Option<f64>,
    pub has_clash: Option<bool>,
}

/// Reads every `summary_confidences_{n}.json` entry of one archive, ordered by model index.
pub fn read_archive_scores<R: Read + Seek>(archive_name: &str, reader: R) -> Result<Vec<ScoreRow>> {
    let pattern = Regex::new(SUMMARY_ENTRY_PATTERN)?;
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut rows = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(model) = pattern
            .captures(entry.name())
            .and_then(|caps| caps[1].parse::<u32>().ok())
        else {
            continue;
        };

        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        let summary: SummaryConfidences = serde_json::from_str(&content)?;

        rows.push(ScoreRow {
            archive: archive_name.to_string(),
            model,
            iptm: summary.iptm,
            ptm: summary.ptm,
            ranking_score: summary.ranking_score,
            fraction_disordered: summary.fraction_disordered,
            has_clash: summary.clash(),
        });
    }

    rows.sort_by_key(|r| r.model);
    Ok(rows)
}

pub fn write_scores_csv(rows: &[ScoreRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| FoldError::IoError(e.into_error()))
}

pub struct ScoresTask {
    directory: PathBuf,
    output: PathBuf,
}

impl ScoresTask {
    pub fn new(directory: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            output: output.into(),
        }
    }

    fn scores_for(path: &Path) -> Result<Vec<ScoreRow>> {
        let file = std::fs::File::open(path)?;
        read_archive_scores(&file_name(path), file)
    }
}

#[async_trait]
impl Task for ScoresTask {
    fn name(&self) -> &str {
        "scores"
    }

    async fn run(&self) -> Result<TaskReport> {
        let mut report = TaskReport::new(self.name());
        let mut rows = Vec::new();

        for path in list_files(&self.directory, "zip")? {
            match Self::scores_for(&path) {
                Ok(archive_rows) if archive_rows.is_empty() => {
                    tracing::warn!("No summary confidences in {}", file_name(&path));
                    report.skipped += 1;
                }
                Ok(archive_rows) => {
                    tracing::debug!("{}: {} models", file_name(&path), archive_rows.len());
                    rows.extend(archive_rows);
                    report.processed += 1;
                }
                Err(e) => {
                    tracing::error!("Error reading {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }

        if rows.is_empty() {
            tracing::warn!("No scores found in {}", self.directory.display());
            return Ok(report);
        }

        // list_files is sorted, so archives are already in order
        let csv_data = write_scores_csv(&rows)?;
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.output, csv_data).await?;

        tracing::info!("Wrote {} score rows to {}", rows.len(), self.output.display());
        report.outputs.push(self.output.clone());
        Ok(report)
    }
}
