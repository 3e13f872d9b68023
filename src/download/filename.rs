//! Filename derivation and sanitization for fetched files.
//!
//! The saved filename comes from the Content-Disposition header when the
//! server sends one, then from the last URL path segment, then from a
//! fixed fallback. All candidates are sanitized before use. Writes into
//! long-lived directories go through [`resolve_unique_path`] so a repeated
//! name never lands on top of an earlier file.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use url::Url;

/// Name used when neither the response headers nor the URL yield one.
pub(crate) const DEFAULT_FILE_NAME: &str = "file";

/// Parses Content-Disposition header to extract filename.
///
/// Handles both:
/// - `attachment; filename="example.iso"`
/// - `attachment; filename=example.iso`
/// - `attachment; filename*=UTF-8''example.iso` (RFC 5987)
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    // Try filename*= first (RFC 5987 encoded)
    if let Some(pos) = header.find("filename*=") {
        let start = pos + 10;
        let value = header[start..].trim();
        // Format: charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            // Take until ; or end
            let end = encoded.find(';').unwrap_or(encoded.len());
            let encoded_name = &encoded[..end].trim();
            if let Ok(decoded) = urlencoding::decode(encoded_name) {
                return Some(decoded.into_owned());
            }
        }
    }

    // Try regular filename=
    if let Some(pos) = header.find("filename=") {
        let start = pos + 9;
        let value = header[start..].trim();

        // Handle quoted filename
        if let Some(stripped) = value.strip_prefix('"') {
            if let Some(end) = stripped.find('"') {
                return Some(stripped[..end].to_string());
            }
        } else {
            // Unquoted - take until ; or end
            let end = value.find(';').unwrap_or(value.len());
            let filename = value[..end].trim();
            if !filename.is_empty() {
                return Some(filename.to_string());
            }
        }
    }

    None
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters), normalizes whitespace
/// to underscores, and rewrites bare dot segments so the name cannot
/// escape its directory.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }

    // "." and ".." are directory references, not filenames.
    if sanitized.chars().all(|c| c == '.') {
        return sanitized.chars().map(|_| '_').collect();
    }

    sanitized
}

/// Picks a destination under `dir` that no existing file occupies.
///
/// The name is sanitized first. On collision the stem gets a numeric
/// suffix: `file.pdf`, then `file_1.pdf`, `file_2.pdf`, ...
#[must_use]
pub fn resolve_unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let file_name = sanitize_filename(file_name);
    let base = dir.join(&file_name);
    if !base.exists() {
        return base;
    }

    let (stem, ext) = match file_name.rfind('.') {
        Some(pos) => (&file_name[..pos], &file_name[pos..]),
        None => (file_name.as_str(), ""),
    };

    for n in 1..1000 {
        let candidate = dir.join(format!("{stem}_{n}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }

    // Past 999 duplicates, fall back to a clock-derived suffix.
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    dir.join(format!("{stem}_{stamp}{ext}"))
}

/// Filename derived from the URL's last path segment, percent-decoded,
/// or [`DEFAULT_FILE_NAME`] when the path has none.
pub(crate) fn fallback_filename_from_url(url: &Url) -> String {
    if let Some(mut segments) = url.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let decoded = urlencoding::decode(last).unwrap_or_else(|e| {
            debug!(
                segment = %last,
                error = %e,
                "URL decoding failed, using raw segment"
            );
            last.into()
        });
        return sanitize_filename(&decoded);
    }

    DEFAULT_FILE_NAME.to_string()
}
