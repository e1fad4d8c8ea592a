use anyhow::Result;
use clap::{Parser, Subcommand};
use talent_core::admin_cli::{handle_admin_command, AdminCli};
use talent_core::environment::EnvironmentConfig;
use talent_core::web::start_web_server;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Parser)]
#[command(name = "talenthub")]
#[command(about = "Recruitment platform API server and admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server
    Serve {
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Administrative tasks (users, opportunity imports)
    Admin(AdminCli),
}

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("talent_core=info,talenthub=info,rocket=warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { port: 8000 }) {
        Command::Serve { port } => {
            let config = EnvironmentConfig::load()?;
            config.ensure_directories().await?;

            info!("Starting TalentHub API");
            info!(
                "Environment: {}",
                std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
            );
            info!("Database: {}", config.database_path.display());

            start_web_server(config, port).await
        }
        Command::Admin(admin) => handle_admin_command(admin).await,
    }
}
