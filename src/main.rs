//! auditbind server.
//!
//! Loads configuration, initializes logging, and serves the HTTP API.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use auditbind_core::config::AppConfig;

/// Request-bound audit logging server
#[derive(Debug, Parser)]
#[command(name = "auditbind-server", version, about, long_about = None)]
struct Args {
    /// Configuration environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "AUDITBIND_ENV", default_value = "development")]
    env: String,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match AppConfig::load(&args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_logging(&config);

    tracing::info!(
        "Starting auditbind v{} (env: {})",
        env!("CARGO_PKG_VERSION"),
        args.env
    );

    if let Err(e) = auditbind_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
