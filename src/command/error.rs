//! Error types for inbound command parsing.

use thiserror::Error;

use super::MAX_FILE_SIZE_MB;

/// Maximum URL length to accept (standard browser limit).
/// URLs longer than this are rejected to prevent memory issues.
pub const MAX_URL_LENGTH: usize = 2000;

/// Errors that can occur while parsing an inbound command.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// URL is malformed or uses unsupported scheme
    #[error("invalid URL '{url}': {reason}\n  Suggestion: {suggestion}")]
    InvalidUrl {
        /// The URL that failed validation
        url: String,
        /// Why the URL is invalid
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// URL exceeds maximum allowed length
    #[error(
        "URL too long ({length} chars, max {max}): {url_preview}...\n  Suggestion: Use a URL shortener or check for extraneous content"
    )]
    UrlTooLong {
        /// Truncated URL for display
        url_preview: String,
        /// Actual length
        length: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Part size token is not an accepted whole number of megabytes
    #[error("invalid part size '{value}': {reason}\n  Suggestion: {suggestion}")]
    InvalidPartSize {
        /// The token that failed to parse
        value: String,
        /// Why the token is invalid
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },
}

impl CommandError {
    /// Creates an `InvalidUrl` error for a non-web URL scheme.
    #[must_use]
    pub fn unsupported_scheme(url: &str, scheme: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: format!("scheme '{scheme}' is not supported"),
            suggestion: "Use http:// or https:// URLs".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a malformed URL.
    #[must_use]
    pub fn malformed(url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: parse_error.to_string(),
            suggestion: "Check the URL format and try again".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a URL without a host.
    #[must_use]
    pub fn no_host(url: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
            suggestion: "Ensure the URL includes a domain (e.g., example.com)".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a message with no URL at all.
    #[must_use]
    pub fn empty_input() -> Self {
        Self::InvalidUrl {
            url: String::new(),
            reason: "message contains no URL".to_string(),
            suggestion: "Send a URL, optionally followed by a part size in MB".to_string(),
        }
    }

    /// Creates a `UrlTooLong` error for URLs exceeding the maximum length.
    #[must_use]
    pub fn too_long(url: &str) -> Self {
        Self::UrlTooLong {
            url_preview: url.chars().take(50).collect(),
            length: url.len(),
            max: MAX_URL_LENGTH,
        }
    }

    /// Creates an `InvalidPartSize` error for a non-numeric token.
    #[must_use]
    pub fn not_a_number(value: &str) -> Self {
        Self::InvalidPartSize {
            value: value.to_string(),
            reason: "not a whole number of megabytes".to_string(),
            suggestion: "Pass the part size as a plain number, e.g. 'https://... 20'".to_string(),
        }
    }

    /// Creates an `InvalidPartSize` error for a size outside the accepted range.
    #[must_use]
    pub fn part_size_out_of_range(value: &str) -> Self {
        Self::InvalidPartSize {
            value: value.to_string(),
            reason: format!("must be between 1 and {MAX_FILE_SIZE_MB} MB"),
            suggestion: format!("Pick a part size between 1 and {MAX_FILE_SIZE_MB} MB"),
        }
    }

    /// Creates an `InvalidPartSize` error for unexpected trailing tokens.
    #[must_use]
    pub fn trailing_input(extra: &str) -> Self {
        Self::InvalidPartSize {
            value: extra.to_string(),
            reason: "unexpected text after the part size".to_string(),
            suggestion: "Send exactly one URL and an optional part size in MB".to_string(),
        }
    }
}
