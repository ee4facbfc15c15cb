//! One-off lifecycle sweep.

use chrono::Utc;
use serde::Serialize;
use tabled::Tabled;

use courtside_core::config::AppConfig;
use courtside_core::error::AppError;

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct SweepRow {
    #[tabled(rename = "Bookings completed")]
    bookings_completed: u64,
    #[tabled(rename = "Bookings cancelled")]
    bookings_cancelled: u64,
    #[tabled(rename = "Classes completed")]
    classes_completed: u64,
}

pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let services = super::open_services(config).await?;
    let report = services.sweep.run(Utc::now()).await?;

    output::print_item(
        &SweepRow {
            bookings_completed: report.bookings_completed,
            bookings_cancelled: report.bookings_cancelled,
            classes_completed: report.classes_completed,
        },
        format,
    );
    Ok(())
}
