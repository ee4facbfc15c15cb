//! Job executor: dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use courtside_core::error::AppError;
use courtside_service::ServiceRegistry;

use crate::jobs::{SessionCleanupHandler, SweepJobHandler};

/// A unit of periodic work.
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Name the job is scheduled and invoked under.
    fn job_type(&self) -> &'static str;

    /// Run once as of `now`, returning a JSON summary.
    async fn execute(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError>;
}

/// Error from job execution. Scheduled jobs are retried on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// No handler under that name.
    #[error("Unknown job type '{0}'")]
    UnknownJob(String),

    /// The job itself failed.
    #[error("Job failed: {0}")]
    Failed(#[from] AppError),
}

/// Dispatches jobs to the appropriate handler by name.
#[derive(Debug, Default)]
pub struct JobExecutor {
    handlers: HashMap<&'static str, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor with the sweep and session cleanup handlers registered.
    pub fn with_default_jobs(services: &ServiceRegistry) -> Self {
        let mut executor = Self::new();
        executor.register(Arc::new(SweepJobHandler::new(Arc::clone(&services.sweep))));
        executor.register(Arc::new(SessionCleanupHandler::new(Arc::clone(
            &services.session_cleanup,
        ))));
        executor
    }

    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type();
        tracing::info!(job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    pub fn job_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.handlers.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Run the named job once.
    pub async fn execute(
        &self,
        job_type: &str,
        now: DateTime<Utc>,
    ) -> Result<Value, JobExecutionError> {
        let handler = self
            .handlers
            .get(job_type)
            .ok_or_else(|| JobExecutionError::UnknownJob(job_type.to_string()))?;

        let started = std::time::Instant::now();
        let result = handler.execute(now).await;
        match &result {
            Ok(summary) => tracing::info!(
                job_type,
                elapsed_ms = started.elapsed().as_millis() as u64,
                summary = %summary,
                "Job completed"
            ),
            Err(e) => tracing::error!(job_type, error = %e, "Job failed"),
        }
        result
    }
}
