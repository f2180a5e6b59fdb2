//! Constants for the relay module (policy ceiling, timeouts).

/// Default size ceiling for admitted downloads (500 MiB).
pub const MAX_CONTENT_LENGTH: u64 = 500 * 1024 * 1024;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes between chunks for slow upstreams).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Generic binary content type used when the upstream declares none.
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// Maximum URL length to accept (standard browser limit).
/// URLs longer than this are rejected to prevent memory issues.
pub const MAX_URL_LENGTH: usize = 2000;
