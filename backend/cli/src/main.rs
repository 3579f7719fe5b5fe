mod doctor_cmd;
mod status_cmd;
mod terminal_output;

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use linedrive_config::{log_report, presence, redacted_snapshot, validate, RelayConfig};
use linedrive_gateway::{start_server, GatewayState};

#[derive(Parser)]
#[command(name = "linedrive")]
#[command(about = "linedrive — relay LINE media into Google Drive")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server (default)
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check configuration and service-account credentials
    Doctor,
    /// Query the health endpoint of a running instance
    Status {
        /// Health URL; defaults to localhost on the configured port
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    let env: HashMap<String, String> = std::env::vars().collect();
    let config = RelayConfig::from_map(&env);
    let cli = Cli::parse();

    let healthy = match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let config = RelayConfig {
                port: port.unwrap_or(config.port),
                ..config
            };
            logging::init_logger(
                &config.logging.level,
                config.logging.dir.as_deref(),
                config.logging.json,
            );
            run_server(config, presence(&env)).await?;
            true
        }
        Commands::Doctor => doctor_cmd::run(&config, &presence(&env)).await?,
        Commands::Status { url } => {
            let url = url.unwrap_or_else(|| status_cmd::default_url(config.port));
            status_cmd::run(&url).await?
        }
    };

    Ok(if healthy { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn run_server(config: RelayConfig, presence: Vec<(&'static str, bool)>) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        folder = config.drive.folder_id.as_deref().unwrap_or("(root)"),
        public = config.drive.public_share,
        "Starting linedrive relay"
    );

    let report = validate(&config);
    log_report(&report);
    if !report.is_valid() {
        anyhow::bail!("configuration is invalid; run `linedrive doctor` for details");
    }
    tracing::debug!(config = %redacted_snapshot(&config)?, "Effective configuration");

    let ip: IpAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address))?;
    let addr = SocketAddr::new(ip, config.port);

    let state = GatewayState::from_config(&config, presence)?;
    start_server(addr, state).await
}
