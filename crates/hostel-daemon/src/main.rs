//! Hostel Daemon - occupancy service
//!
//! The daemon provides:
//! - REST API for floor layouts, live occupancy and reconciled floor views
//! - Check-in, check-out and reservations with per-room history
//! - Signed sheet webhook ingestion
//! - Event streaming of occupancy changes

use clap::Parser;
use hostel_daemon::{DaemonConfig, DaemonError, DaemonResult, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Hostel Daemon CLI
#[derive(Parser)]
#[command(name = "hosteld")]
#[command(about = "Hostel Daemon - occupancy service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "HOSTEL_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides the configuration file)
    #[arg(short, long, env = "HOSTEL_LISTEN_ADDR")]
    listen: Option<String>,

    /// Additional layout catalog files
    #[arg(long = "catalog")]
    catalogs: Vec<std::path::PathBuf>,

    /// Accept unsigned webhook submissions
    #[arg(long)]
    insecure_webhook: bool,

    /// Log level
    #[arg(long, env = "HOSTEL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "HOSTEL_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Initialize tracing
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if cli.json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    config.layouts.catalogs.extend(cli.catalogs);
    if cli.insecure_webhook {
        config.webhook.require_signature = false;
    }

    println!(
        r#"
  Hostel Occupancy Daemon
  Version: {}
  Listening: {}
  Webhook signatures: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr,
        if config.webhook.require_signature {
            "required"
        } else {
            "optional"
        }
    );

    let server = Server::new(config)?;
    server.run().await
}
