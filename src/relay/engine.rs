//! Relay engine: the pipeline façade handed to the HTTP surface.
//!
//! Ties validation, probing, admission, and the byte relay together.
//! The engine is constructed once from an explicit immutable
//! [`RelayConfig`] and shared behind `Arc`; it holds no per-request state,
//! so concurrent requests need no locking.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::admission::{download_admission, probe_admission};
use super::client::{HttpUpstream, Upstream};
use super::constants::APPLICATION_OCTET_STREAM;
use super::error::RelayError;
use super::probe::{ResourceMetadata, probe};
use super::stream::RelaySession;
use super::validate::validate;
use crate::config::RelayConfig;

/// Probe-then-stream proxy engine.
///
/// # Example
///
/// ```no_run
/// use vidrelay_core::config::RelayConfig;
/// use vidrelay_core::relay::RelayEngine;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = RelayEngine::new(&RelayConfig::default());
/// let session = engine.open_relay("https://example.com/movie.mp4").await?;
/// println!("{} ({:?} bytes)", session.filename(), session.content_length());
/// # Ok(())
/// # }
/// ```
pub struct RelayEngine {
    upstream: Arc<dyn Upstream>,
    max_content_length: u64,
}

impl RelayEngine {
    /// Creates an engine with the production HTTP upstream.
    #[must_use]
    pub fn new(config: &RelayConfig) -> Self {
        let upstream = Arc::new(HttpUpstream::with_timeouts(
            config.connect_timeout_secs,
            config.read_timeout_secs,
        ));
        Self::with_upstream(config, upstream)
    }

    /// Creates an engine over an injected upstream capability.
    ///
    /// Used by tests to substitute doubles that simulate slow, failing, or
    /// disconnecting upstreams.
    #[must_use]
    pub fn with_upstream(config: &RelayConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            upstream,
            max_content_length: config.max_content_length,
        }
    }

    /// The configured admission size ceiling, in bytes.
    #[must_use]
    pub fn max_content_length(&self) -> u64 {
        self.max_content_length
    }

    /// Probes a raw URL for resource metadata.
    ///
    /// Validates the input, then runs the HEAD-first probe. The advisory
    /// admission decision is logged for observability; the caller surfaces
    /// the raw metadata fields and lets the client gate on them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput`/`DisallowedScheme` for bad input and
    /// `UpstreamUnreachable` when the resource cannot be reached at all.
    #[instrument(skip(self), fields(url = %raw))]
    pub async fn probe(&self, raw: &str) -> Result<ResourceMetadata, RelayError> {
        let url = validate(raw)?;
        let metadata = probe(self.upstream.as_ref(), &url).await?;
        let advisory = probe_admission(&metadata, self.max_content_length);
        debug!(
            allowed = advisory.allowed,
            reason = advisory.reason.as_deref().unwrap_or(""),
            "probe advisory admission"
        );
        Ok(metadata)
    }

    /// Opens a relay session for a raw URL.
    ///
    /// Validates, probes, enforces download admission, then issues the full
    /// GET. The returned session carries the outbound header facts and the
    /// upstream byte stream; dropping its stream cancels the upstream read.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput`/`DisallowedScheme` for bad input,
    /// `UpstreamUnreachable` when probing cannot reach the resource,
    /// `TooLarge`/`UnsupportedType` when admission rejects it, and
    /// `UpstreamFetchFailed` when the full fetch yields no usable
    /// response or body.
    #[instrument(skip(self), fields(url = %raw))]
    pub async fn open_relay(&self, raw: &str) -> Result<RelaySession, RelayError> {
        let url = validate(raw)?;
        let metadata = probe(self.upstream.as_ref(), &url).await?;

        // Empty probed type resolves to the generic binary fallback before
        // admission, so length-only resources stay downloadable.
        let content_type = if metadata.content_type.is_empty() {
            APPLICATION_OCTET_STREAM.to_string()
        } else {
            metadata.content_type.clone()
        };
        download_admission(&content_type, metadata.content_length, self.max_content_length)?;

        let mut response = self
            .upstream
            .get(&url)
            .await
            .map_err(|_| RelayError::fetch_failed(url.as_str(), 0))?;
        if !response.is_success() {
            return Err(RelayError::fetch_failed(url.as_str(), response.status));
        }
        let body = response
            .body
            .take()
            .ok_or_else(|| RelayError::fetch_failed(url.as_str(), response.status))?;

        debug!(
            content_type = %content_type,
            filename = %metadata.filename,
            content_length = ?response.content_length,
            "relay session opened"
        );

        Ok(RelaySession::new(
            content_type,
            metadata.filename,
            response.content_length,
            body,
            url.as_str(),
        ))
    }
}
