//! HTTPay CLI - Inspect the tool registry and escrows from the terminal
//!
//! Read-only: nothing here signs or broadcasts. Configuration comes from a
//! network preset, an optional config file and `HTTPAY_*` variables, with
//! command-line flags on top.
//!
//! # Quick Start
//!
//! ```bash
//! export HTTPAY_REGISTRY_ADDRESS=neutron1...
//! export HTTPAY_ESCROW_ADDRESS=neutron1...
//!
//! httpay --network testnet --rest https://rest-falcron.pion-1.ntrn.tech config check
//! httpay --network testnet tools list
//! httpay --network testnet escrow verify 7 --token <token> --provider neutron1...
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use httpay_sdk::Network;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod display;

use commands::{config, escrow, tools, ConnectionArgs};

/// HTTPay CLI - pay-per-call tools on Neutron
#[derive(Parser)]
#[command(name = "httpay")]
#[command(author = "HTTPay Contributors")]
#[command(version)]
#[command(about = "Inspect HTTPay tools and escrows", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Network preset (mainnet, testnet, local); falls back to HTTPAY_NETWORK
    #[arg(long, global = true)]
    network: Option<Network>,

    /// Config file (TOML, JSON or YAML, snake_case keys)
    #[arg(long, short = 'c', global = true)]
    config: Option<String>,

    /// Cosmos REST endpoint used for queries
    #[arg(long, global = true)]
    rest: Option<String>,

    /// Registry contract address
    #[arg(long, global = true)]
    registry: Option<String>,

    /// Escrow contract address
    #[arg(long, global = true)]
    escrow: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the SDK configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show network presets
    Network {
        #[command(subcommand)]
        action: NetworkCommands,
    },

    /// Browse the tool registry
    Tools {
        #[command(subcommand)]
        action: ToolCommands,
    },

    /// Inspect and verify escrows
    Escrow {
        #[command(subcommand)]
        action: EscrowCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Validate the effective configuration
    Check,

    /// Print the effective configuration
    Show,
}

#[derive(Subcommand)]
enum NetworkCommands {
    /// List known networks
    List,

    /// Print the preset for a network
    Defaults {
        /// Network name
        name: String,
    },
}

#[derive(Subcommand)]
enum ToolCommands {
    /// List registered tools
    List {
        /// Include paused tools
        #[arg(long)]
        all: bool,
    },

    /// Show a single tool
    Get {
        /// Tool id
        tool_id: String,
    },
}

#[derive(Subcommand)]
enum EscrowCommands {
    /// Show an escrow
    Get {
        /// Escrow id
        escrow_id: u64,
    },

    /// Check a presented escrow and auth token
    Verify {
        /// Escrow id
        escrow_id: u64,

        /// Auth token presented by the payer
        #[arg(long)]
        token: String,

        /// Provider address expected on the escrow
        #[arg(long)]
        provider: String,

        /// Evaluate expiry at this height instead of the latest block
        #[arg(long)]
        height: Option<u64>,
    },

    /// Show platform fees held by the escrow contract
    Fees,
}

fn init_logging(format: LogFormat, level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so `--json` output stays parseable
    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level);

    let conn = ConnectionArgs {
        network: cli.network,
        config_file: cli.config,
        rest_endpoint: cli.rest,
        registry_address: cli.registry,
        escrow_address: cli.escrow,
    };
    let json = cli.json;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigCommands::Check => config::check(&conn, json)?,
            ConfigCommands::Show => config::show(&conn)?,
        },

        Commands::Network { action } => match action {
            NetworkCommands::List => config::list_networks(json)?,
            NetworkCommands::Defaults { name } => config::network_defaults(&name, json)?,
        },

        Commands::Tools { action } => match action {
            ToolCommands::List { all } => tools::list(&conn, all, json).await?,
            ToolCommands::Get { tool_id } => tools::get(&conn, &tool_id, json).await?,
        },

        Commands::Escrow { action } => match action {
            EscrowCommands::Get { escrow_id } => escrow::get(&conn, escrow_id, json).await?,
            EscrowCommands::Verify {
                escrow_id,
                token,
                provider,
                height,
            } => {
                let valid = escrow::verify(&conn, escrow_id, &token, &provider, height, json).await?;
                if !valid {
                    std::process::exit(1);
                }
            }
            EscrowCommands::Fees => escrow::fees(&conn, json).await?,
        },
    }

    Ok(())
}
