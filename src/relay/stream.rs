//! Stream relay: pipe an upstream body to the client, chunk by chunk.
//!
//! A [`RelaySession`] binds one upstream response body to one outbound
//! client connection. Its [`RelayStream`] yields bytes in upstream order
//! with bounded memory, and cancels the upstream read as soon as the
//! outbound side goes away: dropping the stream drops the upstream body,
//! which is the cancellation-on-disconnect property the whole system
//! leans on.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use tracing::{debug, warn};

use super::client::ByteStream;

/// Lifecycle of one relay.
///
/// The FETCHING phase of the state machine lives in the engine, before a
/// session exists; a constructed stream starts in `Streaming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Bytes are flowing (or about to).
    Streaming,
    /// Upstream ended cleanly; the outbound stream closed normally.
    Completed,
    /// Upstream read error; the outbound stream was terminated abruptly.
    Failed,
    /// The outbound side was dropped before upstream end (client gone).
    Aborted,
}

/// One relay of an upstream byte stream to a client.
///
/// Owns the upstream body reader and the facts the caller needs for
/// outbound headers. At most one upstream reader exists per session;
/// consuming the session with [`into_stream`](Self::into_stream) hands it
/// over.
pub struct RelaySession {
    content_type: String,
    filename: String,
    content_length: Option<u64>,
    stream: RelayStream,
}

impl std::fmt::Debug for RelaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySession")
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

impl RelaySession {
    pub(crate) fn new(
        content_type: impl Into<String>,
        filename: impl Into<String>,
        content_length: Option<u64>,
        body: ByteStream,
        url: impl Into<String>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            filename: filename.into(),
            content_length,
            stream: RelayStream::new(body, url),
        }
    }

    /// Resolved outbound content type (never empty).
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Derived attachment filename (sanitized, quotable without escaping).
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Upstream-declared content length for the outbound header, if any.
    /// Never guessed; absent means the header is omitted.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Consumes the session, yielding the relay byte stream.
    #[must_use]
    pub fn into_stream(self) -> RelayStream {
        self.stream
    }
}

/// Ordered, bounded-memory relay of an upstream body.
///
/// Yields chunks exactly as the upstream produces them (chunk boundaries
/// carry no meaning; byte order does). After `Completed` or `Failed` the
/// stream is fused. Dropping it mid-stream records `Aborted` and releases
/// the upstream reader — client disconnects are a normal, silent
/// termination, not a fault.
pub struct RelayStream {
    upstream: ByteStream,
    state: RelayState,
    bytes_relayed: u64,
    url: String,
}

impl RelayStream {
    fn new(upstream: ByteStream, url: impl Into<String>) -> Self {
        Self {
            upstream,
            state: RelayState::Streaming,
            bytes_relayed: 0,
            url: url.into(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Bytes relayed so far.
    #[must_use]
    pub fn bytes_relayed(&self) -> u64 {
        self.bytes_relayed
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.state != RelayState::Streaming {
            return Poll::Ready(None);
        }
        match this.upstream.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_relayed += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.state = RelayState::Failed;
                warn!(
                    url = %this.url,
                    bytes = this.bytes_relayed,
                    error = %e,
                    "upstream read failed mid-relay; terminating outbound stream"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.state = RelayState::Completed;
                debug!(url = %this.url, bytes = this.bytes_relayed, "relay completed");
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayStream {
    fn drop(&mut self) {
        if self.state == RelayState::Streaming {
            self.state = RelayState::Aborted;
            debug!(
                url = %self.url,
                bytes = self.bytes_relayed,
                "client disconnected; upstream read cancelled"
            );
        }
    }
}
