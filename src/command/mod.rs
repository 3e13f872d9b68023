//! Inbound command parsing.
//!
//! A downbot command is a single chat message: a download URL followed by
//! an optional part size in megabytes. The literal `/help` asks for the
//! usage text instead.
//!
//! # Accepted Forms
//!
//! - `/help`
//! - `<url>` (fetch with the default part size)
//! - `<url> <part_size_mb>` (fetch with an explicit part size)
//!
//! # Example
//!
//! ```
//! use downbot_core::command::{Command, parse_command};
//!
//! let command = parse_command("https://example.com/video.mkv 25");
//! assert!(matches!(command, Ok(Command::Fetch(_))));
//! ```

mod error;
mod url;

pub use error::{CommandError, MAX_URL_LENGTH};
pub use url::{is_valid_url, validate_url};

use tracing::debug;

/// Part size used when the command does not name one, in megabytes.
pub const DEFAULT_PART_SIZE_MB: u64 = 10;

/// Largest file the bot will fetch, in megabytes. Also the upper bound
/// for an explicit part size.
pub const MAX_FILE_SIZE_MB: u64 = 300;

pub(crate) const BYTES_PER_MB: u64 = 1024 * 1024;

/// A validated fetch request: what to download and how to split it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Normalized download URL.
    pub url: String,
    /// Requested part size in megabytes, in `1..=MAX_FILE_SIZE_MB`.
    pub part_size_mb: u64,
}

impl FetchRequest {
    /// Returns the requested part size in bytes.
    #[must_use]
    pub fn part_size_bytes(&self) -> u64 {
        self.part_size_mb * BYTES_PER_MB
    }

    /// Returns the hard ceiling on downloaded file size, in bytes.
    #[must_use]
    pub fn max_file_bytes() -> u64 {
        MAX_FILE_SIZE_MB * BYTES_PER_MB
    }
}

/// A parsed inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch a URL and deliver it, split if oversized.
    Fetch(FetchRequest),
    /// The literal `/help` message.
    Help,
}

/// Parses one inbound chat message into a [`Command`].
///
/// The message is trimmed first. `/help` must then match exactly (case
/// sensitive, no extra tokens); anything else is treated as a fetch
/// command whose first token must be an http(s) URL.
///
/// # Errors
///
/// Returns [`CommandError::InvalidUrl`] or [`CommandError::UrlTooLong`]
/// when the first token is not a usable URL, and
/// [`CommandError::InvalidPartSize`] when the second token is not a whole
/// number of megabytes in `1..=MAX_FILE_SIZE_MB` or the message carries
/// extra tokens.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_command(text: &str) -> Result<Command, CommandError> {
    let trimmed = text.trim();
    if trimmed == "/help" {
        debug!("help requested");
        return Ok(Command::Help);
    }

    let mut tokens = trimmed.split_whitespace();
    let Some(first) = tokens.next() else {
        return Err(CommandError::empty_input());
    };
    let url = validate_url(first)?;

    let part_size_mb = match tokens.next() {
        None => DEFAULT_PART_SIZE_MB,
        Some(raw) => parse_part_size(raw)?,
    };

    if let Some(extra) = tokens.next() {
        return Err(CommandError::trailing_input(extra));
    }

    debug!(url = %url, part_size_mb, "command parsed");
    Ok(Command::Fetch(FetchRequest { url, part_size_mb }))
}

fn parse_part_size(raw: &str) -> Result<u64, CommandError> {
    let Ok(size_mb) = raw.parse::<u64>() else {
        return Err(CommandError::not_a_number(raw));
    };
    if size_mb == 0 || size_mb > MAX_FILE_SIZE_MB {
        return Err(CommandError::part_size_out_of_range(raw));
    }
    Ok(size_mb)
}
