//! Server entry point for the vidrelay proxy.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};
use vidrelay_core::{RateLimitConfig, RelayConfig, ServerConfig, server};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    // The PORT environment variable wins over the flag (container platforms
    // inject it).
    let port = match std::env::var("PORT") {
        Ok(value) => match value.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                warn!(value = %value, "ignoring non-numeric PORT environment variable");
                args.port
            }
        },
        Err(_) => args.port,
    };

    let config = ServerConfig {
        host: args.host,
        port,
        relay: RelayConfig {
            max_content_length: args.max_size * 1024 * 1024,
            ..RelayConfig::default()
        },
        rate_limit: RateLimitConfig {
            window_secs: args.rate_window,
            max_requests: args.rate_limit,
        },
    };

    info!(host = %config.host, port = config.port, "vidrelay starting");

    server::serve(config).await?;
    Ok(())
}
