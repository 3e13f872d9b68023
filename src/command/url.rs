//! Download URL validation.

use tracing::trace;
use url::Url;

use super::error::{CommandError, MAX_URL_LENGTH};

/// Validates a URL string and normalizes it.
///
/// # Validation rules:
/// - Must not exceed `MAX_URL_LENGTH` (2000 chars)
/// - Must be parseable by the `url` crate
/// - Must use http or https scheme (no ftp, file, etc.)
/// - Must have a host (domain or IP)
///
/// # Errors
///
/// Returns [`CommandError::InvalidUrl`] or [`CommandError::UrlTooLong`]
/// describing which rule the input broke.
pub fn validate_url(raw: &str) -> Result<String, CommandError> {
    if raw.len() > MAX_URL_LENGTH {
        return Err(CommandError::too_long(raw));
    }

    let parsed = Url::parse(raw).map_err(|e| CommandError::malformed(raw, &e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(CommandError::unsupported_scheme(raw, scheme)),
    }

    if parsed.host().is_none() {
        return Err(CommandError::no_host(raw));
    }

    trace!(url = %parsed, "URL validated");
    Ok(parsed.to_string())
}

/// True iff the string is an absolute http(s) URL with a host.
///
/// Pure predicate form of [`validate_url`]; never panics.
#[must_use]
pub fn is_valid_url(raw: &str) -> bool {
    validate_url(raw).is_ok()
}
