//! Metadata probing: learn content type and length without downloading.
//!
//! The prober issues a HEAD request first (cheapest). Servers with
//! inconsistent HEAD support fall back to a GET whose headers are read and
//! whose body is dropped unread; the actual download path re-fetches
//! independently. The fallback order (HEAD first, GET only on failure) is
//! load-bearing: tests assert call counts against upstream doubles.

use tracing::{debug, instrument};

use super::client::Upstream;
use super::error::RelayError;
use super::filename::derive_filename;
use super::validate::ValidatedUrl;

/// Metadata about a remote resource, computed fresh per request.
///
/// `content_length` uses 0 as the "unknown" sentinel: missing or
/// non-numeric `Content-Length` headers probe as 0, indistinguishable from
/// a legitimately empty resource. Admission treats unknown length as
/// not-too-large.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetadata {
    /// Declared content type; empty when the upstream declared none.
    pub content_type: String,
    /// Declared content length; 0 when unknown.
    pub content_length: u64,
    /// Whether the content type declares a video resource.
    pub is_likely_media: bool,
    /// Safe attachment filename derived from the URL and content type.
    pub filename: String,
}

/// Probes a remote resource for its metadata.
///
/// Tries HEAD first; falls back to GET when the HEAD request fails at the
/// transport level, returns a non-success status, or omits a content-type
/// header. Headers are taken from whichever response is used, successful
/// or not — a 404's `text/html` headers are still metadata. The GET
/// fallback's body is dropped without being read.
///
/// # Errors
///
/// Returns `RelayError::UpstreamUnreachable` only when the GET fallback
/// itself fails at the network level.
#[instrument(level = "debug", skip(upstream), fields(url = %url))]
pub async fn probe(
    upstream: &dyn Upstream,
    url: &ValidatedUrl,
) -> Result<ResourceMetadata, RelayError> {
    let response = match upstream.head(url).await {
        Ok(head) if head.is_success() && head.content_type.is_some() => head,
        Ok(head) => {
            debug!(
                status = head.status,
                has_content_type = head.content_type.is_some(),
                "HEAD response unusable, falling back to GET"
            );
            upstream.get(url).await.map_err(RelayError::unreachable)?
        }
        Err(e) => {
            debug!(error = %e, "HEAD request failed, falling back to GET");
            upstream.get(url).await.map_err(RelayError::unreachable)?
        }
    };

    // Fallback GET bodies are dropped here unread; only headers matter.
    let content_type = response.content_type.clone().unwrap_or_default();
    let content_length = response.content_length.unwrap_or(0);
    let is_likely_media = content_type.starts_with("video/");
    let filename = derive_filename(url, &content_type);

    Ok(ResourceMetadata {
        content_type,
        content_length,
        is_likely_media,
        filename,
    })
}
