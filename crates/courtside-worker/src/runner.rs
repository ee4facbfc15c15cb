//! Worker lifecycle tied to the server's shutdown signal.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use courtside_core::config::WorkerConfig;
use courtside_core::error::AppError;

use crate::executor::JobExecutor;
use crate::scheduler::CronScheduler;

#[derive(Debug)]
pub struct WorkerRunner {
    executor: Arc<JobExecutor>,
    config: WorkerConfig,
}

impl WorkerRunner {
    pub fn new(executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self { executor, config }
    }

    /// Start the scheduler, optionally sweep once, then idle until
    /// `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), AppError> {
        let scheduler = CronScheduler::new(Arc::clone(&self.executor)).await?;
        scheduler.register_default_tasks(&self.config).await?;
        scheduler.start().await?;

        if self.config.sweep_on_start {
            // Catch up on anything that finished while the server was down.
            let _ = self.executor.execute("lifecycle_sweep", Utc::now()).await;
        }

        while !*shutdown.borrow() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }

        tracing::info!("Worker stopping");
        scheduler.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread")]
    async fn stops_on_shutdown_signal() {
        let config = WorkerConfig {
            sweep_on_start: false,
            ..WorkerConfig::default()
        };
        let runner = WorkerRunner::new(Arc::new(JobExecutor::new()), config);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(runner.run(rx));
        tx.send(true).unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.is_ok());
    }
}
