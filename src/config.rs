//! Immutable configuration values constructed at startup.
//!
//! The process builds these once (from CLI flags and environment) and
//! passes them into the engine and server constructors. There are no
//! ambient globals inside the core; everything policy-shaped lives here.

use std::net::IpAddr;

use crate::relay::constants::{CONNECT_TIMEOUT_SECS, MAX_CONTENT_LENGTH, READ_TIMEOUT_SECS};

/// Policy and transport settings for the relay engine.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Admission size ceiling in bytes.
    pub max_content_length: u64,
    /// Upstream connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Upstream read timeout in seconds (between chunks).
    pub read_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_content_length: MAX_CONTENT_LENGTH,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// Request-rate admission settings for the HTTP surface.
///
/// Fixed window per client address. A `max_requests` of 0 disables the
/// limiter entirely.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    pub window_secs: u64,
    /// Requests allowed per window per client; 0 disables limiting.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 100 requests per 15 minutes
        Self {
            window_secs: 15 * 60,
            max_requests: 100,
        }
    }
}

/// Everything the server process needs to run.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Relay engine settings.
    pub relay: RelayConfig,
    /// Request-rate admission settings.
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 4000,
            relay: RelayConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}
