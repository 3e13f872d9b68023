//! Job-scoped working directories.
//!
//! Every accepted fetch command gets its own directory under a shared
//! workspace root. The download, the archive, and the parts all live
//! there, and the directory is destroyed when the job finishes, however
//! it finished.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, instrument};

/// Prefix for job directory names under the workspace root.
const JOB_DIR_PREFIX: &str = "downbot-job-";

/// Errors from workspace management.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Workspace directory could not be created or removed.
    #[error("workspace error at {path}: {source}")]
    Io {
        /// The directory involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl WorkspaceError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A per-job scratch directory.
///
/// Prefer [`Workspace::destroy`] at the end of a job; dropping the value
/// removes the directory as a backstop when destroy was never reached.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a fresh job directory under `root`, creating `root` first
    /// when missing. Concurrent jobs get distinct directories.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Io`] when the root or the job directory
    /// cannot be created.
    #[instrument(skip(root), fields(root = %root.display()))]
    pub async fn create(root: &Path) -> Result<Self, WorkspaceError> {
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|e| WorkspaceError::io(root, e))?;

        let root_owned = root.to_path_buf();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(JOB_DIR_PREFIX)
                .tempdir_in(&root_owned)
        })
        .await
        .map_err(|e| WorkspaceError::io(root, std::io::Error::other(e)))?
        .map_err(|e| WorkspaceError::io(root, e))?;

        debug!(path = %dir.path().display(), "workspace created");
        Ok(Self { dir })
    }

    /// Absolute path of the job directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the job directory and everything in it.
    ///
    /// A directory that is already gone counts as destroyed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Io`] when the directory exists but
    /// cannot be removed.
    #[instrument(skip(self), fields(path = %self.dir.path().display()))]
    pub async fn destroy(self) -> Result<(), WorkspaceError> {
        let Self { dir } = self;
        let path = dir.path().to_path_buf();

        let close_result = tokio::task::spawn_blocking(move || dir.close())
            .await
            .map_err(|e| WorkspaceError::io(path.clone(), std::io::Error::other(e)))?;

        match close_result {
            Ok(()) => {
                debug!("workspace destroyed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WorkspaceError::io(path, e)),
        }
    }
}
