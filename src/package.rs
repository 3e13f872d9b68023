//! Packaging of oversized downloads into numbered archive parts.
//!
//! Files at or below the requested part size are delivered unchanged.
//! Larger files are compressed into a single `.7z` archive which is
//! then split into fixed-size parts named `<file>.7z.0001`,
//! `<file>.7z.0002`, and so on. Concatenating the parts in order
//! restores the archive byte for byte, so standard 7z tooling can
//! extract the original file on the receiving side.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, instrument};

use crate::download::FetchedFile;

/// Read buffer length used while splitting the archive.
const SPLIT_CHUNK_LEN: usize = 64 * 1024;

/// Errors from compressing and splitting a downloaded file.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The 7z encoder failed.
    #[error("failed to compress {path}: {source}")]
    Compress {
        /// The file being compressed.
        path: PathBuf,
        /// The underlying encoder error.
        #[source]
        source: sevenz_rust::Error,
    },

    /// Reading or writing archive data failed.
    #[error("packaging IO error at {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The blocking compression task was cancelled or panicked.
    #[error("compression task for {path} did not finish: {source}")]
    Join {
        /// The file being compressed.
        path: PathBuf,
        /// The task failure.
        #[source]
        source: tokio::task::JoinError,
    },
}

impl PackageError {
    /// Creates a compression error.
    pub fn compress(path: impl Into<PathBuf>, source: sevenz_rust::Error) -> Self {
        Self::Compress {
            path: path.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a task failure error.
    pub fn join(path: impl Into<PathBuf>, source: tokio::task::JoinError) -> Self {
        Self::Join {
            path: path.into(),
            source,
        }
    }
}

/// What the transport should deliver for one finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryUnit {
    /// The file fits within one part and ships unmodified.
    Single(PathBuf),
    /// Numbered archive parts, in delivery order.
    Parts(Vec<PathBuf>),
}

impl DeliveryUnit {
    /// Paths to deliver, in order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::Single(path) => std::slice::from_ref(path),
            Self::Parts(parts) => parts,
        }
    }
}

/// Prepares a downloaded file for delivery.
///
/// Files no larger than `part_size_bytes` pass through untouched.
/// Larger files are compressed and split; the intermediate archive is
/// removed once the parts exist.
///
/// # Errors
///
/// Returns [`PackageError`] when compression fails or when archive
/// data cannot be read or written.
#[instrument(skip(file), fields(path = %file.path.display(), size_bytes = file.size_bytes))]
pub async fn package_file(
    file: &FetchedFile,
    part_size_bytes: u64,
) -> Result<DeliveryUnit, PackageError> {
    if file.size_bytes <= part_size_bytes {
        debug!("file fits in a single part, skipping compression");
        return Ok(DeliveryUnit::Single(file.path.clone()));
    }

    let archive_path = compress_to_7z(&file.path).await?;
    let parts = split_into_parts(&archive_path, part_size_bytes).await?;

    tokio::fs::remove_file(&archive_path)
        .await
        .map_err(|e| PackageError::io(&archive_path, e))?;

    info!(parts = parts.len(), "file packaged into numbered parts");
    Ok(DeliveryUnit::Parts(parts))
}

/// Compresses `source` into a sibling `<source>.7z` archive.
///
/// The encoder is CPU-bound, so it runs on the blocking thread pool.
async fn compress_to_7z(source: &Path) -> Result<PathBuf, PackageError> {
    let mut archive_name = source.as_os_str().to_os_string();
    archive_name.push(".7z");
    let archive_path = PathBuf::from(archive_name);

    let src = source.to_path_buf();
    let dest = archive_path.clone();
    tokio::task::spawn_blocking(move || sevenz_rust::compress_to_path(&src, &dest))
        .await
        .map_err(|e| PackageError::join(source, e))?
        .map_err(|e| PackageError::compress(source, e))?;

    debug!(archive = %archive_path.display(), "archive written");
    Ok(archive_path)
}

/// Splits the archive into consecutive parts of at most
/// `part_size_bytes` each.
///
/// Part numbering starts at `0001`. When the archive length is an
/// exact multiple of the part size, the empty trailing part is removed
/// so every delivered part carries data.
async fn split_into_parts(
    archive_path: &Path,
    part_size_bytes: u64,
) -> Result<Vec<PathBuf>, PackageError> {
    let archive = File::open(archive_path)
        .await
        .map_err(|e| PackageError::io(archive_path, e))?;
    let mut reader = BufReader::new(archive);
    let mut buffer = vec![0u8; SPLIT_CHUNK_LEN];

    let mut parts = Vec::new();
    let mut seq: u32 = 1;
    loop {
        let part_path = part_path_for(archive_path, seq);
        let written = copy_part(&mut reader, &part_path, part_size_bytes, &mut buffer).await?;

        if written == 0 {
            tokio::fs::remove_file(&part_path)
                .await
                .map_err(|e| PackageError::io(&part_path, e))?;
            break;
        }

        parts.push(part_path);
        if written < part_size_bytes {
            break;
        }
        seq += 1;
    }

    Ok(parts)
}

/// Copies up to `limit` bytes from `reader` into a new file at
/// `part_path`, returning how many bytes landed there.
async fn copy_part(
    reader: &mut BufReader<File>,
    part_path: &Path,
    limit: u64,
    buffer: &mut [u8],
) -> Result<u64, PackageError> {
    let part_file = File::create(part_path)
        .await
        .map_err(|e| PackageError::io(part_path, e))?;
    let mut writer = BufWriter::new(part_file);

    let mut written: u64 = 0;
    while written < limit {
        let remaining = limit - written;
        let read_len = usize::try_from(remaining).map_or(buffer.len(), |r| r.min(buffer.len()));
        let n = reader
            .read(&mut buffer[..read_len])
            .await
            .map_err(|e| PackageError::io(part_path, e))?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&buffer[..n])
            .await
            .map_err(|e| PackageError::io(part_path, e))?;
        written += n as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| PackageError::io(part_path, e))?;
    Ok(written)
}

/// Builds the path of part `seq` for an archive, e.g.
/// `video.mkv.7z.0001`.
fn part_path_for(archive_path: &Path, seq: u32) -> PathBuf {
    let mut name = archive_path.as_os_str().to_os_string();
    name.push(format!(".{seq:04}"));
    PathBuf::from(name)
}
