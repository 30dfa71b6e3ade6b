use crate::core::fasta::{file_name, list_regular_files};
use crate::domain::model::TaskReport;
use crate::domain::ports::Task;
use crate::utils::error::Result;
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};

/// fold_{ligand}_variant_{variant}_{target}.zip as downloaded from AlphaFold Server
const RESULT_ARCHIVE_PATTERN: &str =
    r"^fold_([a-zA-Z0-9]+)_variant_([a-zA-Z0-9]+)_([a-zA-Z0-9]+)\.zip$";

pub fn result_archive_regex() -> Result<Regex> {
    Ok(RegexBuilder::new(RESULT_ARCHIVE_PATTERN)
        .case_insensitive(true)
        .build()?)
}

/// Returns `{ligand}_variant_{target}_{variant}.zip`, or `None` when the name
/// doesn't match or is already in that form.
pub fn renamed_archive_name(pattern: &Regex, file_name: &str) -> Option<String> {
    let caps = pattern.captures(file_name)?;
    let new_name = format!("{}_variant_{}_{}.zip", &caps[1], &caps[3], &caps[2]);
    (new_name != file_name).then_some(new_name)
}

pub struct RenameTask {
    directory: PathBuf,
    dry_run: bool,
}

impl RenameTask {
    pub fn new(directory: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            directory: directory.into(),
            dry_run,
        }
    }

    /// A failed rename is counted and the remaining files are still processed.
    async fn rename_files(&self, files: &[PathBuf]) -> Result<TaskReport> {
        let mut report = TaskReport::new(self.name());
        let pattern = result_archive_regex()?;

        for path in files {
            let name = file_name(path);
            if !name.ends_with(".zip") {
                continue;
            }

            let Some(new_name) = renamed_archive_name(&pattern, &name) else {
                report.skipped += 1;
                continue;
            };

            let new_path = self.directory.join(&new_name);
            if new_path.exists() {
                tracing::warn!("Not renaming {}: {} already exists", name, new_name);
                report.skipped += 1;
                continue;
            }

            if self.dry_run {
                tracing::info!("Would rename: {} -> {}", name, new_name);
                report.record_output(new_path);
                continue;
            }

            match rename_archive(path, &new_path).await {
                Ok(()) => {
                    tracing::info!("Renamed: {} -> {}", name, new_name);
                    report.record_output(new_path);
                }
                Err(e) => {
                    tracing::error!("Error renaming {}: {}", name, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl Task for RenameTask {
    fn name(&self) -> &str {
        "rename"
    }

    async fn run(&self) -> Result<TaskReport> {
        tracing::info!("Starting file renaming in: {}", self.directory.display());
        let files = list_regular_files(&self.directory)?;
        let report = self.rename_files(&files).await?;
        tracing::info!("Completed. Total files renamed: {}", report.processed);
        Ok(report)
    }
}

async fn rename_archive(from: &Path, to: &Path) -> Result<()> {
    tokio::fs::rename(from, to).await?;
    Ok(())
}
