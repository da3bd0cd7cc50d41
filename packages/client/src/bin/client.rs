//! Terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-client -- --name alice --room lobby
//! ```

use clap::Parser;
use roomcast_client::{build_ws_url, run_client};
use roomcast_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "roomcast-client", version, about = "Terminal chat client for roomcast")]
struct Args {
    /// Server base URL
    #[arg(short, long, default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Display name shown next to your messages
    #[arg(short, long)]
    name: String,

    /// Room to join; the server's default room when omitted
    #[arg(short, long)]
    room: Option<String>,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let result = match build_ws_url(&args.url, &args.name, args.room.as_deref()) {
        Ok(url) => run_client(&url).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
