//! Admission policy: may a probed resource be downloaded?
//!
//! Pure functions of [`ResourceMetadata`] and fixed policy constants.
//! The probe path and the download path deliberately apply different
//! rules — probing is an advisory UX hint, downloading is the actual
//! gate, and the download gate is more permissive on type so legitimate
//! video served as generic binary is not blocked. Keep the two rules
//! separate; unifying them changes observable behavior.

use super::constants::APPLICATION_OCTET_STREAM;
use super::error::RelayError;
use super::probe::ResourceMetadata;

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionDecision {
    /// Whether the download may proceed.
    pub allowed: bool,
    /// Why it may not, when it may not.
    pub reason: Option<String>,
}

impl AdmissionDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Returns true when a declared length exceeds the ceiling.
///
/// A length of 0 is the "unknown" sentinel and never exceeds the ceiling;
/// HEAD responses frequently omit length, and blocking on the unknown
/// would permanently reject servers that never report one.
#[must_use]
pub fn exceeds_ceiling(content_length: u64, ceiling: u64) -> bool {
    content_length > 0 && content_length > ceiling
}

/// Advisory admission for the probe path (UI gating).
///
/// Allowed when the resource looks like video and is not known to be over
/// the ceiling. Stricter on type than [`download_admission`]: a generic
/// binary type probes as not-likely-video even though it would download.
#[must_use]
pub fn probe_admission(metadata: &ResourceMetadata, ceiling: u64) -> AdmissionDecision {
    if !metadata.is_likely_media {
        return AdmissionDecision::deny(format!(
            "content type '{}' does not look like video",
            metadata.content_type
        ));
    }
    if exceeds_ceiling(metadata.content_length, ceiling) {
        return AdmissionDecision::deny(format!(
            "declared length {} exceeds the {ceiling} byte ceiling",
            metadata.content_length
        ));
    }
    AdmissionDecision::allow()
}

/// Enforced admission for the download path (the byte relay).
///
/// `content_type` is the resolved type: callers substitute
/// `application/octet-stream` for an empty probed type before this check.
/// Size is checked before type, matching the response-status precedence
/// (413 before 415).
///
/// # Errors
///
/// Returns `RelayError::TooLarge` when the declared length exceeds the
/// ceiling and `RelayError::UnsupportedType` when the type is neither
/// `video/*` nor exactly `application/octet-stream`.
pub fn download_admission(
    content_type: &str,
    content_length: u64,
    ceiling: u64,
) -> Result<(), RelayError> {
    if exceeds_ceiling(content_length, ceiling) {
        return Err(RelayError::too_large(content_length, ceiling));
    }
    if !content_type.starts_with("video/") && content_type != APPLICATION_OCTET_STREAM {
        return Err(RelayError::unsupported_type(content_type));
    }
    Ok(())
}
