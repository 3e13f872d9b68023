//! HTTP client wrapper for downloading files.
//!
//! This module provides the `HttpClient` struct which handles streaming
//! downloads with proper timeout configuration, a hard size ceiling, and
//! error handling.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_DISPOSITION;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::{fallback_filename_from_url, parse_content_disposition, sanitize_filename};
use crate::user_agent;

/// HTTP client for downloading files with streaming support.
///
/// This client is designed to be created once and reused across jobs,
/// taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use downbot_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let fetched = client
///     .fetch_to_dir("https://example.com/image.iso", Path::new("./work"), 300 * 1024 * 1024)
///     .await?;
/// println!("Downloaded {} bytes to {}", fetched.size_bytes, fetched.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A downloaded file: where it landed and how big it is.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    /// Path of the file inside the destination directory.
    pub path: PathBuf,
    /// Size on disk in bytes.
    pub size_bytes: u64,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads a file from `url` into `dest_dir`, refusing bodies larger
    /// than `max_bytes`.
    ///
    /// The filename is determined by:
    /// 1. Content-Disposition header (if present)
    /// 2. URL path (last segment, percent-decoded)
    /// 3. The literal name `file`
    ///
    /// The body is streamed to disk. The running byte count is checked
    /// against `max_bytes` before each chunk is written, so an oversized
    /// transfer aborts as soon as the ceiling is crossed instead of
    /// fetching the remainder. When the server announces a Content-Length
    /// above the ceiling the request is rejected before any body bytes
    /// are read.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to download from
    /// * `dest_dir` - Directory to save the file to
    /// * `max_bytes` - Hard ceiling on body size
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - The body exceeds `max_bytes`
    /// - Writing to disk fails
    ///
    /// On any error the partially written file is removed.
    #[must_use = "fetch result contains the path to the downloaded file"]
    #[instrument(skip(self, dest_dir), fields(url = %url))]
    pub async fn fetch_to_dir(
        &self,
        url: &str,
        dest_dir: &Path,
        max_bytes: u64,
    ) -> Result<FetchedFile, DownloadError> {
        debug!("starting download");

        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        // Servers that announce an oversized body are refused before any
        // body bytes are read. Absent or compressed Content-Length falls
        // through to the streaming check below.
        if let Some(announced) = response.content_length()
            && announced > max_bytes
        {
            return Err(DownloadError::too_large(url, max_bytes));
        }

        let file_name = extract_filename(&response, &parsed_url);
        let file_path = dest_dir.join(&file_name);
        debug!(filename = %file_name, path = %file_path.display(), "resolved output path");

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        // Stream response body to file, with cleanup on error
        let stream_result = stream_to_file(&mut file, response, url, &file_path, max_bytes).await;

        if stream_result.is_err() {
            debug!(path = %file_path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&file_path).await;
        }

        let size_bytes = stream_result?;

        info!(
            path = %file_path.display(),
            bytes = size_bytes,
            "download complete"
        );

        Ok(FetchedFile {
            path: file_path,
            size_bytes,
        })
    }
}

/// Streams response body to file, returning bytes written.
///
/// The byte count is checked before each chunk is written, so no data past
/// `max_bytes` ever lands on disk. Extracted from the client method to
/// enable cleanup on error in the caller.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    max_bytes: u64,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        bytes_written += chunk.len() as u64;
        if bytes_written > max_bytes {
            return Err(DownloadError::too_large(url, max_bytes));
        }

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

/// Extracts filename from Content-Disposition header or URL path.
fn extract_filename(response: &reqwest::Response, url: &Url) -> String {
    if let Some(cd) = response.headers().get(CONTENT_DISPOSITION)
        && let Ok(cd_str) = cd.to_str()
        && let Some(filename) = parse_content_disposition(cd_str)
    {
        return sanitize_filename(&filename);
    }

    fallback_filename_from_url(url)
}
