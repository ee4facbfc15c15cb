//! Database migration command.

use courtside_core::config::{AppConfig, StoreBackend};
use courtside_core::error::AppError;
use courtside_database::DatabasePool;
use courtside_database::migration::run_migrations;

use crate::output;

pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend != StoreBackend::Postgres {
        return Err(AppError::configuration(
            "Migrations only apply to the postgres backend",
        ));
    }

    println!("Running database migrations...");
    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;
    pool.close().await;
    output::print_success("All migrations applied.");
    Ok(())
}
