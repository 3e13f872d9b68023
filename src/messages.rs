//! User-facing reply texts.
//!
//! Every string the bot sends back lives here so wording stays
//! consistent across transports and the numbers track the limits in
//! [`crate::command`].

use crate::command::{DEFAULT_PART_SIZE_MB, MAX_FILE_SIZE_MB};

/// Reaction placed on the originating message while a job runs.
pub const PROGRESS_REACTION: &str = "Downloading..";

/// Reply for input that contains no usable link.
pub const INVALID_URL: &str = "Send a http(s) link to fetch, or /help for usage.";

/// Reply when the download itself failed.
pub const DOWNLOAD_FAILED: &str = "Download failed. Check the link and try again.";

/// Reply when the file arrived but could not be prepared for delivery.
pub const PROCESSING_FAILED: &str =
    "Something went wrong while preparing your file. Try again later.";

/// Usage text for the `/help` command.
#[must_use]
pub fn help_text() -> String {
    format!(
        "Send a link to fetch a file:\n\
         \n\
         <url> [part_size_mb]\n\
         \n\
         Files larger than the part size (default {DEFAULT_PART_SIZE_MB} MB) are compressed \
         and delivered as numbered 7z parts: <file>.7z.0001, <file>.7z.0002, and so on. \
         Files over {MAX_FILE_SIZE_MB} MB are not fetched.\n\
         \n\
         To restore a split file, concatenate the parts in order and extract:\n\
         \n\
         cat <file>.7z.* > <file>.7z\n\
         7z x <file>.7z"
    )
}

/// Reply for a part size that is not a whole number of megabytes in
/// range.
#[must_use]
pub fn invalid_part_size() -> String {
    format!("Part size must be a whole number of megabytes between 1 and {MAX_FILE_SIZE_MB}.")
}

/// Reply for a file that exceeds the fetch limit.
#[must_use]
pub fn too_large(limit_mb: u64) -> String {
    format!("That file is larger than the {limit_mb} MB limit and cannot be fetched.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_text_names_the_limits() {
        let help = help_text();
        assert!(help.contains("10 MB"), "default part size should appear");
        assert!(help.contains("300 MB"), "fetch ceiling should appear");
        assert!(help.contains(".7z.0001"), "part naming should appear");
        assert!(help.contains("cat "), "restore instructions should appear");
    }

    #[test]
    fn test_invalid_part_size_names_the_range() {
        let reply = invalid_part_size();
        assert!(reply.contains('1'));
        assert!(reply.contains("300"));
    }

    #[test]
    fn test_too_large_embeds_the_limit() {
        assert!(too_large(300).contains("300 MB"));
        assert!(too_large(25).contains("25 MB"));
    }
}
