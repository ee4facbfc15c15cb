//! Lifecycle sweep: finishes past allocations and, when configured, drops
//! unconfirmed bookings whose start has passed. Safe to run repeatedly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use courtside_core::result::AppResult;
use courtside_database::store::{BookingStore, ClassStore};

/// Rows changed by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub bookings_completed: u64,
    pub bookings_cancelled: u64,
    pub classes_completed: u64,
}

impl SweepReport {
    pub fn total(&self) -> u64 {
        self.bookings_completed + self.bookings_cancelled + self.classes_completed
    }
}

#[derive(Debug, Clone)]
pub struct SweepService {
    bookings: Arc<dyn BookingStore>,
    classes: Arc<dyn ClassStore>,
    auto_cancel_unpaid: bool,
}

impl SweepService {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        classes: Arc<dyn ClassStore>,
        auto_cancel_unpaid: bool,
    ) -> Self {
        Self {
            bookings,
            classes,
            auto_cancel_unpaid,
        }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let bookings_completed = self.bookings.complete_finished(now).await?;
        let bookings_cancelled = if self.auto_cancel_unpaid {
            self.bookings.cancel_unconfirmed_started(now).await?
        } else {
            0
        };
        let classes_completed = self.classes.complete_finished(now).await?;

        let report = SweepReport {
            bookings_completed,
            bookings_cancelled,
            classes_completed,
        };
        if report.total() > 0 {
            info!(
                bookings_completed,
                bookings_cancelled, classes_completed, "Lifecycle sweep applied"
            );
        }
        Ok(report)
    }
}
