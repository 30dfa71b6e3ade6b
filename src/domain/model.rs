use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One FASTA entry. `header` is stored without the leading `>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastaFile {
    pub records: Vec<FastaRecord>,
}

impl FastaFile {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Task 執行結果摘要
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskReport {
    pub task: String,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outputs: Vec<PathBuf>,
}

impl TaskReport {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }

    pub fn record_output(&mut self, path: PathBuf) {
        self.processed += 1;
        self.outputs.push(path);
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} processed, {} skipped, {} failed",
            self.task, self.processed, self.skipped, self.failed
        )
    }
}
