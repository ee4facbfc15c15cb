//! User management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use courtside_core::config::AppConfig;
use courtside_core::error::AppError;
use courtside_core::types::PageRequest;
use courtside_database::store::UserStore;
use courtside_entity::user::User;
use courtside_service::user::RegisterRequest;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an admin account; the password is prompted for
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List users
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Active")]
    active: bool,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            slug: u.slug.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            active: u.is_active,
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = super::open_services(config).await?;

    match &args.command {
        UserCommand::CreateAdmin { email, name, phone } => {
            let password = dialoguer::Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

            let user = services
                .users
                .create_admin(RegisterRequest {
                    email: email.clone(),
                    password,
                    full_name: name.clone(),
                    phone: phone.clone(),
                })
                .await?;
            output::print_success(&format!("Admin {} created ({})", user.email, user.id));
        }
        UserCommand::List { page, per_page } => {
            let page = services
                .stores
                .users
                .list(&PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<UserRow> = page.items.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {}/{} ({} users)",
                    page.page, page.total_pages, page.total_items
                );
            }
        }
    }

    Ok(())
}
