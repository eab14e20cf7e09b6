/// User Service - CRUD API for users
use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use user_service::{
    config::{AppConfig, LogFormat, LogSettings},
    db,
    repository::PgUserRepository,
    server::{self, ApiServer},
};

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User CRUD API service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the schema and start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Listen port, overrides the configuration
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },
    /// Apply the schema and exit
    Migrate {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, port } => {
            let mut config = AppConfig::load(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            init_tracing(&config.log);
            serve(config).await?;
        }
        Commands::Migrate { config } => {
            let config = AppConfig::load(config.as_deref())?;
            init_tracing(&config.log);
            migrate(config).await?;
        }
    }

    Ok(())
}

fn init_tracing(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("user_service={0},tower_http={0}", settings.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match settings.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting User Service");
    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    // Repository -> Service -> Handlers
    let repo = Arc::new(PgUserRepository::new(pool.clone()));
    let service = server::user_service(repo);

    let api = ApiServer::bind(&config.server, service).await?;
    api.run(server::shutdown_signal()).await?;

    let grace = config.server.shutdown_grace();
    if tokio::time::timeout(grace, pool.close()).await.is_err() {
        tracing::warn!("Database pool did not close within {:?}", grace);
    }
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;

    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;
    pool.close().await;
    Ok(())
}
