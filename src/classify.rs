//! Content-signature classification and filename suffix repair.
//!
//! Downloaded files often arrive without a useful extension (opaque URLs,
//! missing Content-Disposition headers). This module sniffs the leading
//! bytes of a file, matches them against known signatures, and appends
//! the implied suffix to the filename when it is missing.
//!
//! The suffix is the minor component of the detected MIME type, so a file
//! recognized as `application/pdf` gets `.pdf` and one recognized as
//! `image/jpeg` gets `.jpeg`. Suffixes are appended, never substituted:
//! a misnamed `photo.png` holding JPEG data becomes `photo.png.jpeg`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument};

/// Leading bytes read for signature matching. Every signature the
/// detector knows fits well within this window.
const SNIFF_LEN: usize = 8192;

/// Errors that can occur during classification.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// File could not be read or renamed.
    #[error("IO error classifying {path}: {source}")]
    Io {
        /// The path being classified.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ClassifyError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Returns the filename suffix implied by the file's content signature.
///
/// The suffix is the minor component of the detected MIME type
/// (`application/pdf` gives `pdf`). Returns `None` when the leading bytes
/// match no known signature, which includes empty files and plain text.
///
/// # Errors
///
/// Returns [`ClassifyError::Io`] when the file cannot be opened or read.
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn detect_suffix(path: &Path) -> Result<Option<&'static str>, ClassifyError> {
    let file = File::open(path)
        .await
        .map_err(|e| ClassifyError::io(path, e))?;

    let mut head = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .await
        .map_err(|e| ClassifyError::io(path, e))?;

    let Some(kind) = infer::get(&head) else {
        debug!("no known content signature");
        return Ok(None);
    };

    let mime = kind.mime_type();
    let suffix = mime.rsplit('/').next().unwrap_or(mime);
    debug!(mime, suffix, "content signature detected");
    Ok(Some(suffix))
}

/// Renames `path` so its filename carries the suffix implied by its
/// content, returning the (possibly unchanged) path.
///
/// The suffix is appended, never substituted: `report` becomes
/// `report.pdf` while a mislabeled `photo.png` holding JPEG data becomes
/// `photo.png.jpeg`. A name already ending in the detected suffix is left
/// alone, so repeated calls are stable. Files with no recognizable
/// signature are left untouched.
///
/// # Errors
///
/// Returns [`ClassifyError::Io`] when the file cannot be read or the
/// rename fails.
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn ensure_suffix(path: &Path) -> Result<PathBuf, ClassifyError> {
    let Some(suffix) = detect_suffix(path).await? else {
        return Ok(path.to_path_buf());
    };

    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(path.to_path_buf());
    };

    if has_suffix(file_name, suffix) {
        debug!(suffix, "filename already carries its content suffix");
        return Ok(path.to_path_buf());
    }

    let renamed = path.with_file_name(format!("{file_name}.{suffix}"));
    tokio::fs::rename(path, &renamed)
        .await
        .map_err(|e| ClassifyError::io(path, e))?;
    info!(to = %renamed.display(), "appended content suffix");
    Ok(renamed)
}

/// True when `file_name` already ends in `.{suffix}` (ASCII case-insensitive).
fn has_suffix(file_name: &str, suffix: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(suffix))
}
