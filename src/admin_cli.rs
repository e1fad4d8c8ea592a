// src/admin_cli.rs
use crate::database::{DatabaseConfig, OpportunityRepository, UserRepository, UserService};
use crate::types::NewOpportunity;
use crate::utils::get_file_extension;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Args)]
pub struct AdminCli {
    #[command(subcommand)]
    pub command: AdminCommand,

    #[arg(long, default_value = "data/talenthub.db")]
    pub database_path: PathBuf,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Add a new user
    UserAdd {
        email: String,
        display_name: String,
        #[arg(long, default_value = "candidate")]
        role: String,
    },
    /// Remove/deactivate a user by email
    UserRemove { email: String },
    /// List all active users
    UserList,
    /// Check if an email has an active account
    UserCheck { email: String },
    /// Import opportunities from a CSV file
    /// (columns: title,company,department,location,description)
    ImportOpportunities { csv_file: PathBuf },
    /// Initialize the database
    Init,
}

pub async fn handle_admin_command(cli: AdminCli) -> Result<()> {
    // Initialize database
    let mut db_config = DatabaseConfig::new(cli.database_path.clone());
    db_config.init_pool().await?;
    db_config.migrate().await?;

    let pool = db_config.pool()?;
    let user_repo = UserRepository::new(pool);
    let user_service = UserService::new(pool);
    let opportunity_repo = OpportunityRepository::new(pool);

    match cli.command {
        AdminCommand::UserAdd {
            email,
            display_name,
            role,
        } => {
            if !crate::database::User::is_known_role(&role) {
                error!("Unknown role: {} (use candidate, recruiter, or admin)", role);
                return Ok(());
            }

            match user_repo.create(&email, &display_name, &role).await {
                Ok(user) => {
                    info!("✅ User created successfully:");
                    info!("   Email: {}", user.email);
                    info!("   Name: {}", user.display_name);
                    info!("   Role: {}", user.role);
                    info!("   ID: {}", user.id);
                }
                Err(e) => {
                    if e.to_string().contains("UNIQUE constraint failed") {
                        info!("❌ Error: Email '{}' already exists", email);
                    } else {
                        error!("Failed to create user: {}", e);
                    }
                }
            }
        }

        AdminCommand::UserRemove { email } => match user_repo.deactivate(&email).await {
            Ok(true) => {
                info!("✅ User deactivated: {}", email);
            }
            Ok(false) => {
                info!("❌ No active user found for email: {}", email);
            }
            Err(e) => {
                error!("Failed to deactivate user: {}", e);
            }
        },

        AdminCommand::UserList => match user_repo.list_active().await {
            Ok(users) => {
                if users.is_empty() {
                    info!("No active users found.");
                } else {
                    info!("Active users:");
                    info!(
                        "{:<5} {:<30} {:<25} {:<12} {:<20}",
                        "ID", "Email", "Name", "Role", "Created"
                    );
                    info!("{}", "-".repeat(95));

                    for user in users {
                        info!(
                            "{:<5} {:<30} {:<25} {:<12} {:<20}",
                            user.id,
                            user.email,
                            user.display_name,
                            user.role,
                            user.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
            Err(e) => {
                error!("Failed to list users: {}", e);
            }
        },

        AdminCommand::UserCheck { email } => match user_service.validate_user_access(&email).await
        {
            Ok(Some(user)) => {
                info!(
                    "✅ Email '{}' has an active account (role: {})",
                    email, user.role
                );
                info!("   User ID: {}", user.id);
                info!(
                    "   Created: {}",
                    user.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
            Ok(None) => {
                info!("❌ Email '{}' has no active account", email);
            }
            Err(e) => {
                error!("Failed to check email: {}", e);
            }
        },

        AdminCommand::ImportOpportunities { csv_file } => {
            if !csv_file.exists() {
                info!("❌ CSV file not found: {}", csv_file.display());
                return Ok(());
            }

            if get_file_extension(&csv_file.to_string_lossy()) != Some("csv".to_string()) {
                warn!("File does not have a .csv extension: {}", csv_file.display());
            }

            let content = tokio::fs::read_to_string(&csv_file).await?;
            let mut reader = csv::Reader::from_reader(content.as_bytes());

            let mut success_count = 0;
            let mut error_count = 0;

            for result in reader.records() {
                match result {
                    Ok(record) => {
                        let title = record.get(0).unwrap_or("").trim();
                        let company = record.get(1).unwrap_or("").trim();

                        if title.is_empty() || company.is_empty() {
                            error_count += 1;
                            info!("⚠️  Skipping record without title or company");
                            continue;
                        }

                        let field_or_none = |index: usize| {
                            record
                                .get(index)
                                .map(str::trim)
                                .filter(|value| !value.is_empty())
                                .map(str::to_string)
                        };

                        let new = NewOpportunity {
                            title: title.to_string(),
                            company: company.to_string(),
                            department: field_or_none(2),
                            location: field_or_none(3),
                            description: field_or_none(4),
                        };

                        match opportunity_repo.create(&new).await {
                            Ok(opportunity) => {
                                success_count += 1;
                                info!(
                                    "✅ Added: {} at {} (id {})",
                                    opportunity.title, opportunity.company, opportunity.id
                                );
                            }
                            Err(e) => {
                                error_count += 1;
                                info!("❌ Failed to add {}: {}", title, e);
                            }
                        }
                    }
                    Err(e) => {
                        error_count += 1;
                        info!("❌ CSV parsing error: {}", e);
                    }
                }
            }

            info!("Import completed:");
            info!("  ✅ Success: {}", success_count);
            info!("  ❌ Errors:  {}", error_count);
        }

        AdminCommand::Init => {
            info!(
                "✅ Database initialized at: {}",
                cli.database_path.display()
            );
            info!("   Tables created: users, profiles, opportunities, applications");
            info!("");
            info!("Usage:");
            info!("  talenthub admin user-add <email> <name> [--role recruiter]");
            info!("  talenthub admin import-opportunities <file.csv>");
            info!("  talenthub admin user-check <email>");
        }
    }

    Ok(())
}
