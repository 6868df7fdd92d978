//! Hostel CLI - command-line interface for hostel occupancy
//!
//! This CLI gives wardens and operators a terminal view of:
//! - Facilities and their floors
//! - Reconciled floor views with occupancy statistics
//! - Room check-in, check-out and reservations
//! - Sheet webhook submissions and signatures

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod commands;
mod config;
mod error;
mod output;

use commands::room::{CheckInArgs, RoomAddress};
use commands::{floor, hostel, room, webhook};
use config::CliConfig;
use error::CliResult;

/// Hostel CLI application
#[derive(Parser)]
#[command(name = "hostel")]
#[command(about = "Hostel - occupancy and floor layout CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "HOSTEL_CLI_CONFIG")]
    config: Option<String>,

    /// Hostel daemon endpoint (overrides the configuration file)
    #[arg(short, long, env = "HOSTEL_ENDPOINT")]
    endpoint: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Check daemon connectivity and counters
    Status,

    /// List facilities
    Hostels,

    /// List the floors of a facility
    Floors {
        /// Facility id
        hostel: String,
    },

    /// Show a floor with live occupancy
    Floor {
        /// Facility id or short code
        hostel: String,
        /// Floor number
        floor: u32,
    },

    /// Show one room
    Room {
        #[command(flatten)]
        address: RoomAddress,

        /// Include up to this many history entries
        #[arg(long)]
        history: Option<usize>,
    },

    /// Check a student into a room
    #[command(alias = "check-in")]
    Checkin(CheckInArgs),

    /// Check a student out of a room
    #[command(alias = "check-out")]
    Checkout {
        #[command(flatten)]
        address: RoomAddress,

        /// Student id
        #[arg(long)]
        student_id: String,
    },

    /// Reserve a vacant room
    Reserve {
        #[command(flatten)]
        address: RoomAddress,

        /// Release the reservation instead
        #[arg(long)]
        release: bool,
    },

    /// Find the room a student is assigned to
    Student {
        /// Student id
        student_id: String,
    },

    /// List students with an active assignment
    Students {
        /// Filter on name, email or student id
        #[arg(short, long)]
        query: Option<String>,

        #[arg(long, default_value = "50")]
        limit: usize,

        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Sheet webhook tools
    Webhook {
        #[command(subcommand)]
        command: webhook::WebhookCommands,
    },

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| config.endpoint.clone())
        .unwrap_or_else(|| "http://localhost:8080".to_string());

    let client = client::HostelClient::new(&endpoint, config.timeout())?;
    let format = cli.output;

    match cli.command {
        Commands::Status => {
            if !hostel::status(&client, format).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Hostels => hostel::list_hostels(&client, format).await,
        Commands::Floors { hostel } => hostel::list_floors(&hostel, &client, format).await,
        Commands::Floor { hostel, floor } => floor::execute(&hostel, floor, &client, format).await,
        Commands::Room { address, history } => room::show(&address, history, &client, format).await,
        Commands::Checkin(args) => room::check_in(&args, &client, format).await,
        Commands::Checkout {
            address,
            student_id,
        } => room::check_out(&address, &student_id, &client, format).await,
        Commands::Reserve { address, release } => {
            room::reserve(&address, release, &client, format).await
        }
        Commands::Student { student_id } => room::find_student(&student_id, &client, format).await,
        Commands::Students {
            query,
            limit,
            offset,
        } => room::list_students(query.as_deref(), limit, offset, &client, format).await,
        Commands::Webhook { command } => {
            webhook::execute(command, config.webhook_secret.clone(), &client, format).await
        }
        Commands::Config => {
            println!("Endpoint: {}", endpoint);
            println!("Timeout:  {}s", config.timeout().as_secs());
            println!(
                "Webhook secret: {}",
                if config.webhook_secret.is_some() { "set" } else { "not set" }
            );
            Ok(())
        }
    }
}
