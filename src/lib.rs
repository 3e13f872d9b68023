//! Downbot Core Library
//!
//! This library implements the fetch-and-deliver pipeline behind the
//! downbot tool: it accepts `<url> [part_size_mb]` commands, streams the
//! remote file into a job-scoped workspace, names it by content signature,
//! and packages oversized payloads into numbered 7z parts ready for a chat
//! transport to deliver.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`command`] - Inbound command parsing and URL validation
//! - [`download`] - Streaming HTTP retrieval with a hard size ceiling
//! - [`classify`] - Content-signature detection and suffix repair
//! - [`package`] - 7z archiving and fixed-size part splitting
//! - [`workspace`] - Job-scoped working directories
//! - [`transport`] - Messaging seam for replies and attachments
//! - [`job`] - Per-message orchestration and error-to-reply mapping

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod command;
pub mod download;
pub mod job;
pub mod messages;
pub mod package;
#[cfg(test)]
pub mod test_support;
pub mod transport;
pub(crate) mod user_agent;
pub mod workspace;

// Re-export commonly used types
pub use classify::{ClassifyError, detect_suffix, ensure_suffix};
pub use command::{
    Command, CommandError, DEFAULT_PART_SIZE_MB, FetchRequest, MAX_FILE_SIZE_MB, is_valid_url,
    parse_command, validate_url,
};
pub use download::{DownloadError, FetchedFile, HttpClient};
pub use job::{IncomingMessage, JobError, JobRunner, JobSettings, JobStatus};
pub use package::{DeliveryUnit, PackageError, package_file};
pub use transport::{ChatId, MessageId, Transport, TransportError};
pub use workspace::{Workspace, WorkspaceError};
