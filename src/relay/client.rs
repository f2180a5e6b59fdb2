//! Upstream HTTP capability for probing and fetching remote resources.
//!
//! The relay engine talks to upstream servers through the [`Upstream`]
//! trait so tests can substitute doubles that simulate slow, failing, or
//! disconnecting servers. [`HttpUpstream`] is the production implementation
//! over a pooled reqwest client.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method};
use tracing::{debug, instrument};

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::UpstreamError;
use super::validate::ValidatedUrl;
use crate::user_agent;

/// Boxed upstream body stream.
///
/// Item errors are `std::io::Error` so test doubles can fabricate failures
/// without a concrete HTTP client error type.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static>>;

/// The headers-and-body view of one upstream response.
///
/// `content_length` is the declared `Content-Length` header parsed as an
/// integer; missing or non-numeric values are `None`. `body` is `None` when
/// the response carries no readable body (HEAD responses, test doubles).
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Declared content length, if present and numeric.
    pub content_length: Option<u64>,
    /// Response body stream, when one is readable.
    pub body: Option<ByteStream>,
}

impl UpstreamResponse {
    /// Returns true for 2xx status codes.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

/// Injected HTTP-client interface for reaching upstream servers.
///
/// Implementations must not retry or follow policies of their own beyond
/// transport concerns; fallback ordering (HEAD first, GET on failure) is
/// the prober's responsibility so call-count assertions stay meaningful.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issues a HEAD request.
    async fn head(&self, url: &ValidatedUrl) -> Result<UpstreamResponse, UpstreamError>;

    /// Issues a GET request.
    async fn get(&self, url: &ValidatedUrl) -> Result<UpstreamResponse, UpstreamError>;
}

/// Production upstream over a pooled reqwest client.
///
/// Created once at startup and shared across requests, taking advantage of
/// connection pooling. Configuration:
/// - Connect timeout: 30 seconds by default
/// - Read timeout: 5 minutes between chunks (a relay of a large file must
///   not be bounded by a whole-request deadline)
/// - Gzip decompression: enabled. When reqwest decompresses transparently
///   it hides the upstream `Content-Length`, which keeps the declared
///   length consistent with the bytes actually relayed.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl Default for HttpUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpUpstream {
    /// Creates an upstream client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates an upstream client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_relay_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    #[instrument(level = "debug", skip(self), fields(url = %url))]
    async fn request(
        &self,
        method: Method,
        url: &ValidatedUrl,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let is_head = method == Method::HEAD;
        let response = self
            .client
            .request(method, url.as_str())
            .send()
            .await
            .map_err(|e| UpstreamError::new(url.as_str(), e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        debug!(status, ?content_type, ?content_length, "upstream response");

        // HEAD responses have no readable body; everything else streams.
        let body: Option<ByteStream> = if is_head {
            None
        } else {
            Some(Box::pin(
                response.bytes_stream().map_err(std::io::Error::other),
            ))
        };

        Ok(UpstreamResponse {
            status,
            content_type,
            content_length,
            body,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn head(&self, url: &ValidatedUrl) -> Result<UpstreamResponse, UpstreamError> {
        self.request(Method::HEAD, url).await
    }

    async fn get(&self, url: &ValidatedUrl) -> Result<UpstreamResponse, UpstreamError> {
        self.request(Method::GET, url).await
    }
}
