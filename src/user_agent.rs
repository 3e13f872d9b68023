//! Shared User-Agent string for the download HTTP client.
//!
//! Single source for project URL and UA format so server operators can
//! identify the tool (good citizenship; RFC 9308).

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/downbot";

/// Default User-Agent for download requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("downbot/{version} (file-splitter-bot; +{PROJECT_UA_URL})")
}
