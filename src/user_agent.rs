//! Shared User-Agent string for upstream relay traffic.
//!
//! Single source for project URL and UA format so upstream servers can
//! identify and contact us (good citizenship; RFC 9308).

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/vidrelay";

/// Default User-Agent for upstream probe and relay requests.
#[must_use]
pub(crate) fn default_relay_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("vidrelay/{version} (media-relay-proxy; +{PROJECT_UA_URL})")
}
