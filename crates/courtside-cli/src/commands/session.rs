//! Refresh-session maintenance commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use courtside_core::config::AppConfig;
use courtside_core::error::AppError;
use courtside_database::store::UserStore;
use courtside_entity::user::User;
use courtside_service::ServiceRegistry;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Revoke expired sessions and purge old revoked ones
    Cleanup,
    /// List a user's active sessions
    List {
        /// Account email
        email: String,
    },
    /// Log a user out of every device
    RevokeAll {
        /// Account email
        email: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct CleanupRow {
    #[tabled(rename = "Revoked")]
    revoked: u64,
    #[tabled(rename = "Purged")]
    purged: u64,
}

#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    #[tabled(rename = "Device")]
    device_id: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Last used")]
    last_used_at: String,
    #[tabled(rename = "Expires")]
    expires_at: String,
}

pub async fn execute(
    args: &SessionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = super::open_services(config).await?;

    match &args.command {
        SessionCommand::Cleanup => {
            let report = services.session_cleanup.run_cleanup(Utc::now()).await?;
            output::print_item(
                &CleanupRow {
                    revoked: report.revoked,
                    purged: report.purged,
                },
                format,
            );
        }
        SessionCommand::List { email } => {
            let user = find_user(&services, email).await?;
            let rows: Vec<SessionRow> = services
                .sessions
                .active_sessions(user.id)
                .await?
                .into_iter()
                .map(|s| SessionRow {
                    device_id: s.device_id,
                    ip: s.ip_address.unwrap_or_else(|| "-".to_string()),
                    created_at: s.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    last_used_at: s.last_used_at.format("%Y-%m-%d %H:%M").to_string(),
                    expires_at: s.expires_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        SessionCommand::RevokeAll { email, force } => {
            let user = find_user(&services, email).await?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Log {} out of every device?", user.email))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let revoked = services.sessions.logout_all_devices(user.id).await?;
            output::print_success(&format!(
                "Revoked {revoked} session(s) for {}",
                user.email
            ));
        }
    }

    Ok(())
}

async fn find_user(services: &ServiceRegistry, email: &str) -> Result<User, AppError> {
    services
        .stores
        .users
        .find_by_email(&email.trim().to_lowercase())
        .await?
        .ok_or_else(|| AppError::not_found(format!("No user with email {email}")))
}
