//! nr-gateway: Notification Router Main Binary
//!
//! Main entry point for the notification router application.
//!
//! Usage:
//!   nr-gateway           - Start the HTTP server
//!   nr-gateway --help    - Show help

mod server;

use nr_core::Config;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Server mode
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("nr-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting nr-gateway...");
    tracing::info!("Public URL: {}", config.server.public_url);

    if config.line_notify.client_id.is_none() {
        tracing::warn!(
            "LINE Notify client_id not configured; the authorization flow will answer 501"
        );
    }

    server::start_server(config).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("nr-gateway - Notification Router");
    println!();
    println!("Usage:");
    println!("  nr-gateway           Start the HTTP server");
    println!("  nr-gateway --help    Show this help message");
    println!("  nr-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  SERVER_PORT                Listen port (default: 8080)");
    println!("  PUBLIC_URL                 Externally reachable base URL");
    println!("  LINE_NOTIFY_CLIENT_ID      LINE Notify OAuth client id");
    println!("  LINE_NOTIFY_CLIENT_SECRET  LINE Notify OAuth client secret");
}
