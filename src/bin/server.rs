//! Realtime chat relay server.
//!
//! Maintains a live presence roster and relays broadcast and private
//! messages between connected WebSocket clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin aqchat-relay -- --port 8025
//! ```

use clap::Parser;

use aqchat_relay::{ServerConfig, logger::setup_logger};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "aqchat-relay", about = "Realtime chat relay server")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8025)]
    port: u16,

    /// Path of the WebSocket endpoint
    #[arg(long, default_value = "/ws/websocket")]
    ws_path: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig {
        port: args.port,
        ws_path: args.ws_path,
    };

    // Run the server
    if let Err(e) = aqchat_relay::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
