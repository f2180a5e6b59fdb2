//! CLI argument definitions using clap derive macros.

use std::net::IpAddr;

use clap::Parser;

/// Probe and stream remote video downloads through a relay proxy.
///
/// Vidrelay lets clients inspect a remote URL's metadata without
/// downloading it, then streams the resource through the server with a
/// browser-friendly attachment filename.
#[derive(Parser, Debug)]
#[command(name = "vidrelay")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind (the PORT environment variable, when set, wins)
    #[arg(short, long, default_value_t = 4000)]
    pub port: u16,

    /// Admission size ceiling in MiB (1-10240)
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..=10240))]
    pub max_size: u64,

    /// Requests allowed per rate window per client (0 to disable, max 100000)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=100_000))]
    pub rate_limit: u32,

    /// Rate window length in seconds (1-86400)
    #[arg(long, default_value_t = 900, value_parser = clap::value_parser!(u64).range(1..=86400))]
    pub rate_window: u64,
}
