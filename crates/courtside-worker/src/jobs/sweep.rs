//! Booking and class lifecycle sweep.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use courtside_service::SweepService;

use crate::executor::{JobExecutionError, JobHandler};

#[derive(Debug)]
pub struct SweepJobHandler {
    sweep: Arc<SweepService>,
}

impl SweepJobHandler {
    pub fn new(sweep: Arc<SweepService>) -> Self {
        Self { sweep }
    }
}

#[async_trait]
impl JobHandler for SweepJobHandler {
    fn job_type(&self) -> &'static str {
        "lifecycle_sweep"
    }

    async fn execute(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError> {
        let report = self.sweep.run(now).await?;
        Ok(serde_json::to_value(report).map_err(courtside_core::AppError::from)?)
    }
}
