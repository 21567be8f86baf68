//! Applique relay CLI
//!
//! Runs the component relay over SSE or stdio.

use std::path::PathBuf;

use anyhow::{Context, Result};
use applique_relay::config::{ConfigOverrides, LogFormat, RelayConfig};
use applique_relay::RelayServer;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "applique-relay")]
#[command(about = "MCP relay for the Applique component knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend query endpoint
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over Server-Sent Events
    Sse {
        /// Bind host
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(long)]
        port: Option<u16>,

        /// Browser origin allowed to connect
        #[arg(long)]
        allowed_origin: Option<String>,
    },

    /// Serve MCP over stdin/stdout
    Stdio,

    /// Show server information
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RelayConfig::from_file(path)?,
        None => RelayConfig::default(),
    };
    config.merge_env_vars()?;

    let mut overrides = ConfigOverrides {
        backend_url: cli.backend_url,
        log_level: cli.log_level,
        ..Default::default()
    };
    if let Commands::Sse {
        host,
        port,
        allowed_origin,
    } = &cli.command
    {
        overrides.host = host.clone();
        overrides.port = *port;
        overrides.allowed_origin = allowed_origin.clone();
    }
    config.apply_overrides(overrides);
    config.validate().context("Invalid configuration")?;

    init_logging(&config);

    let relay = RelayServer::new(config)?;

    match cli.command {
        Commands::Sse { .. } => {
            tracing::info!("Starting Applique relay in SSE mode");
            relay.serve_sse().await?;
        }
        Commands::Stdio => {
            tracing::info!("Starting Applique relay in stdio mode");
            relay.serve_stdio().await?;
        }
        Commands::Info => {
            let info = serde_json::json!({
                "name": relay.mcp().config().name(),
                "version": relay.mcp().config().version(),
                "protocolVersion": relay.mcp().config().protocol_version(),
                "backend": relay.config().backend.query_url,
                "tools": relay.mcp().tools().list(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}

/// Logs always go to stderr; stdout belongs to the stdio transport.
fn init_logging(config: &RelayConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
