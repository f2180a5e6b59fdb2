//! Error types for the relay module.
//!
//! This module defines structured errors for the probe and download paths,
//! providing context-rich error messages for debugging and user feedback.

use thiserror::Error;

/// Transport-level failure from the upstream HTTP capability.
///
/// Carries the failing URL and a human-readable cause. Kept separate from
/// [`RelayError`] so test doubles can fabricate it without depending on a
/// concrete HTTP client error type.
#[derive(Debug, Clone, Error)]
#[error("request to {url} failed: {message}")]
pub struct UpstreamError {
    /// The URL the request was issued against.
    pub url: String,
    /// Human-readable failure cause (DNS, connect, TLS, ...).
    pub message: String,
}

impl UpstreamError {
    /// Creates an upstream transport error.
    #[must_use]
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the probe and download pipeline.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The raw URL input is missing or does not parse as an absolute URL.
    #[error("invalid URL: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// The URL parsed but uses a scheme other than http or https.
    #[error("scheme '{scheme}' is not allowed: only http and https URLs are relayed")]
    DisallowedScheme {
        /// The rejected scheme.
        scheme: String,
    },

    /// Network-level failure reaching the resource during probing
    /// (both the HEAD attempt and the GET fallback failed).
    #[error("upstream unreachable: {source}")]
    UpstreamUnreachable {
        /// The underlying transport failure from the GET fallback.
        #[source]
        source: UpstreamError,
    },

    /// The full fetch did not yield a usable response or body.
    #[error("upstream fetch failed for {url} (HTTP {status})")]
    UpstreamFetchFailed {
        /// The URL that failed to fetch.
        url: String,
        /// The HTTP status code (0 when no response was received).
        status: u16,
    },

    /// Declared content length exceeds the admission ceiling.
    #[error("resource too large: {content_length} bytes exceeds the {limit} byte ceiling")]
    TooLarge {
        /// Length declared by the upstream.
        content_length: u64,
        /// The configured ceiling.
        limit: u64,
    },

    /// Declared content type is not accepted for download.
    #[error("unsupported content type '{content_type}': the URL does not appear to be a video")]
    UnsupportedType {
        /// The rejected content type.
        content_type: String,
    },
}

impl RelayError {
    /// Creates an invalid-input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a disallowed-scheme error.
    #[must_use]
    pub fn disallowed_scheme(scheme: impl Into<String>) -> Self {
        Self::DisallowedScheme {
            scheme: scheme.into(),
        }
    }

    /// Creates an upstream-unreachable error from a transport failure.
    #[must_use]
    pub fn unreachable(source: UpstreamError) -> Self {
        Self::UpstreamUnreachable { source }
    }

    /// Creates an upstream-fetch-failed error.
    ///
    /// `status` is the HTTP status of the unusable response, or 0 when the
    /// request produced no response at all.
    #[must_use]
    pub fn fetch_failed(url: impl Into<String>, status: u16) -> Self {
        Self::UpstreamFetchFailed {
            url: url.into(),
            status,
        }
    }

    /// Creates a too-large admission error.
    #[must_use]
    pub fn too_large(content_length: u64, limit: u64) -> Self {
        Self::TooLarge {
            content_length,
            limit,
        }
    }

    /// Creates an unsupported-type admission error.
    #[must_use]
    pub fn unsupported_type(content_type: impl Into<String>) -> Self {
        Self::UnsupportedType {
            content_type: content_type.into(),
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<UpstreamError>` because the probe
// and download paths classify the same transport failure differently
// (UpstreamUnreachable vs UpstreamFetchFailed). The helper constructors keep
// that classification at the call site where the context lives.
