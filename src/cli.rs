//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use downbot_core::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Fetch a remote file and split oversized payloads into numbered 7z parts.
///
/// Downbot runs chat-style requests: pass the message text
/// (`<url> [part_size_mb]` or `/help`) as arguments, or pipe one request
/// per line on stdin. Delivered files land in the output directory.
#[derive(Parser, Debug)]
#[command(name = "downbot")]
#[command(author, version, about)]
pub struct Args {
    /// Request text: a URL, an optional part size in MB, or /help
    #[arg(value_name = "REQUEST", num_args = 0..)]
    pub request: Vec<String>,

    /// Directory where delivered files are placed
    #[arg(short, long, default_value = "downloads")]
    pub output_dir: PathBuf,

    /// Directory for per-job scratch space (defaults to the system temp dir)
    #[arg(short = 'w', long)]
    pub workspace_dir: Option<PathBuf>,

    /// HTTP connect timeout in seconds (1-300)
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub connect_timeout_secs: u64,

    /// HTTP read timeout in seconds (1-3600)
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout_secs: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// The request tokens joined back into one message line.
    ///
    /// Shell word splitting already separated the URL from the part size;
    /// the command parser owns all further validation.
    #[must_use]
    pub fn request_text(&self) -> String {
        self.request.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_request_parses_for_stdin_mode() {
        let args = Args::try_parse_from(["downbot"]).unwrap();
        assert!(args.request.is_empty());
        assert_eq!(args.request_text(), "");
    }

    #[test]
    fn test_cli_single_url_parses() {
        let args = Args::try_parse_from(["downbot", "https://example.com/file.bin"]).unwrap();
        assert_eq!(args.request_text(), "https://example.com/file.bin");
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_url_and_part_size_rejoin_as_one_message() {
        let args = Args::try_parse_from(["downbot", "https://example.com/file.bin", "25"]).unwrap();
        assert_eq!(args.request_text(), "https://example.com/file.bin 25");
    }

    #[test]
    fn test_cli_help_command_is_a_plain_request() {
        let args = Args::try_parse_from(["downbot", "/help"]).unwrap();
        assert_eq!(args.request_text(), "/help");
    }

    #[test]
    fn test_cli_output_dir_defaults_to_downloads() {
        let args = Args::try_parse_from(["downbot", "/help"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn test_cli_output_dir_flags() {
        let args = Args::try_parse_from(["downbot", "-o", "out", "/help"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("out"));

        let args = Args::try_parse_from(["downbot", "--output-dir", "elsewhere", "/help"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_cli_workspace_dir_defaults_to_none() {
        let args = Args::try_parse_from(["downbot", "/help"]).unwrap();
        assert!(args.workspace_dir.is_none());
    }

    #[test]
    fn test_cli_workspace_dir_flag() {
        let args = Args::try_parse_from(["downbot", "-w", "/tmp/scratch", "/help"]).unwrap();
        assert_eq!(args.workspace_dir, Some(PathBuf::from("/tmp/scratch")));
    }

    // ==================== Timeout Tests ====================

    #[test]
    fn test_cli_timeouts_default_to_client_constants() {
        let args = Args::try_parse_from(["downbot", "/help"]).unwrap();
        assert_eq!(args.connect_timeout_secs, CONNECT_TIMEOUT_SECS);
        assert_eq!(args.read_timeout_secs, READ_TIMEOUT_SECS);
    }

    #[test]
    fn test_cli_connect_timeout_flag() {
        let args =
            Args::try_parse_from(["downbot", "--connect-timeout-secs", "10", "/help"]).unwrap();
        assert_eq!(args.connect_timeout_secs, 10);
    }

    #[test]
    fn test_cli_read_timeout_flag() {
        let args = Args::try_parse_from(["downbot", "--read-timeout-secs", "600", "/help"]).unwrap();
        assert_eq!(args.read_timeout_secs, 600);
    }

    #[test]
    fn test_cli_connect_timeout_zero_rejected() {
        let result = Args::try_parse_from(["downbot", "--connect-timeout-secs", "0", "/help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_read_timeout_over_max_rejected() {
        let result = Args::try_parse_from(["downbot", "--read-timeout-secs", "3601", "/help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    // ==================== Logging Flags ====================

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["downbot", "-v", "/help"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["downbot", "-vv", "/help"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["downbot", "-q", "/help"]).unwrap();
        assert!(args.quiet);

        let args = Args::try_parse_from(["downbot", "--quiet", "/help"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = Args::try_parse_from(["downbot", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        // --version causes early exit, so we check it returns an error with Version kind
        let result = Args::try_parse_from(["downbot", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["downbot", "--invalid-flag", "/help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
