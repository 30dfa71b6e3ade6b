use crate::core::{Task, TaskReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct TaskRunner<T: Task> {
    task: T,
    monitor: SystemMonitor,
}

impl<T: Task> TaskRunner<T> {
    pub fn new(task: T) -> Self {
        Self::new_with_monitoring(task, false)
    }

    pub fn new_with_monitoring(task: T, monitoring: bool) -> Self {
        Self {
            task,
            monitor: SystemMonitor::new(monitoring),
        }
    }

    pub async fn run(&self) -> Result<TaskReport> {
        tracing::info!("--- Starting {} ---", self.task.name());
        self.monitor.log_stats("Start");

        let report = self.task.run().await?;

        self.monitor.log_stats("Done");
        tracing::info!("--- {} ---", report.summary());
        self.monitor.log_final_stats();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FoldError;
    use async_trait::async_trait;

    struct FixedTask {
        fail: bool,
    }

    #[async_trait]
    impl Task for FixedTask {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn run(&self) -> Result<TaskReport> {
            if self.fail {
                return Err(FoldError::processing("boom"));
            }
            let mut report = TaskReport::new(self.name());
            report.record_output("a.fasta".into());
            report.skipped = 2;
            Ok(report)
        }
    }

    #[tokio::test]
    async fn test_runner_returns_task_report() {
        let runner = TaskRunner::new(FixedTask { fail: false });
        let report = runner.run().await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.summary(), "fixed: 1 processed, 2 skipped, 0 failed");
    }

    #[tokio::test]
    async fn test_runner_propagates_errors() {
        let runner = TaskRunner::new_with_monitoring(FixedTask { fail: true }, true);
        assert!(runner.run().await.is_err());
    }
}
