//! Room-based WebSocket chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-server -- --port 8080
//! ```

use std::path::PathBuf;

use clap::Parser;
use roomcast_server::infrastructure::config::{DEFAULT_CONFIG_PATH, ServerConfig};
use roomcast_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "roomcast-server", version, about = "Room-based WebSocket chat server")]
struct Args {
    /// Path to the JSON config file; created with defaults if missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Address to bind, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match ServerConfig::load_or_create(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = roomcast_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
