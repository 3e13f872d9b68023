//! HTTP download module for streaming files to disk.
//!
//! This module provides functionality for downloading files from HTTP/HTTPS
//! URLs with streaming support, so large files never sit in memory.
//!
//! # Features
//!
//! - Streaming downloads straight into a job workspace
//! - Hard size ceiling enforced while the body is still streaming
//! - Automatic filename extraction from Content-Disposition headers
//! - Numeric-suffix destination resolution for name collisions
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use downbot_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let fetched = client
//!     .fetch_to_dir("https://example.com/image.iso", Path::new("./work"), 300 * 1024 * 1024)
//!     .await?;
//! println!("Downloaded: {}", fetched.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;

pub use client::{FetchedFile, HttpClient};
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::resolve_unique_path;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
