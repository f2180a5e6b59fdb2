//! URL validation: the trust boundary of the relay pipeline.
//!
//! Every component past this one only ever receives a [`ValidatedUrl`],
//! never a raw string. This prevents scheme smuggling (`file:`, `ftp:`)
//! and malformed-URL crashes downstream.

use url::Url;

use super::constants::MAX_URL_LENGTH;
use super::error::RelayError;

/// An immutable URL guaranteed to parse and to use an allowed scheme.
///
/// Created only by [`validate`]; consumed by the prober and the relay.
/// The string form is canonical: scheme and host lowercased, default
/// ports elided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(Url);

impl ValidatedUrl {
    /// Returns the canonical string form of the URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the path segments of the URL, when the path is hierarchical.
    pub(crate) fn path_segments(&self) -> Option<std::str::Split<'_, char>> {
        self.0.path_segments()
    }
}

impl std::fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Validates a raw string as a fetchable remote location.
///
/// # Validation rules:
/// - Must be non-empty (after trimming nothing; whitespace-only is empty input)
/// - Must not exceed `MAX_URL_LENGTH` (2000 chars)
/// - Must parse as an absolute URL
/// - Must use the http or https scheme (no ftp, file, etc.)
///
/// No network access occurs here.
///
/// # Errors
///
/// Returns `RelayError::InvalidInput` for missing or unparseable input and
/// `RelayError::DisallowedScheme` for schemes outside http/https.
pub fn validate(raw: &str) -> Result<ValidatedUrl, RelayError> {
    if raw.trim().is_empty() {
        return Err(RelayError::invalid_input("URL is required"));
    }

    if raw.len() > MAX_URL_LENGTH {
        return Err(RelayError::invalid_input(format!(
            "URL too long ({} chars, max {MAX_URL_LENGTH})",
            raw.len()
        )));
    }

    let parsed = Url::parse(raw).map_err(|e| RelayError::invalid_input(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(RelayError::disallowed_scheme(scheme)),
    }

    Ok(ValidatedUrl(parsed))
}
