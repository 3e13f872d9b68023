//! End-to-end handling of one incoming chat message.
//!
//! [`JobRunner`] owns the full pipeline: parse the message, download
//! into a fresh per-job workspace, name the file by its content
//! signature, split oversized files into numbered parts, and hand the
//! results to the [`Transport`]. The progress reaction is cleared and
//! the workspace destroyed on every exit path, success or not.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::classify::ensure_suffix;
use crate::command::{BYTES_PER_MB, Command, CommandError, FetchRequest, parse_command};
use crate::download::{DownloadError, FetchedFile, HttpClient};
use crate::messages;
use crate::package::{PackageError, package_file};
use crate::transport::{ChatId, MessageId, Transport, TransportError};
use crate::workspace::{Workspace, WorkspaceError};

/// One message received from a chat, as handed to the runner.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Chat the message arrived in.
    pub chat: ChatId,
    /// The message itself, used for progress reactions.
    pub message: MessageId,
    /// Raw message text.
    pub text: String,
}

/// Limits and locations shared by every job a runner handles.
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// Directory under which per-job workspaces are created.
    pub workspace_root: PathBuf,
    /// Hard ceiling on downloaded file size in bytes.
    pub max_file_bytes: u64,
}

impl JobSettings {
    /// Settings with the standard fetch ceiling.
    #[must_use]
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            max_file_bytes: FetchRequest::max_file_bytes(),
        }
    }
}

/// How a handled message ended, for callers that report exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// The request was served.
    Completed,
    /// The message was not a usable command; the sender was told.
    Rejected,
    /// The job started but failed; the sender was told.
    Failed,
}

/// Failures inside a running job.
///
/// Each wrapped error already carries its own context, so the
/// variants are transparent. [`JobError::user_message`] maps them to
/// the reply the requester sees.
#[derive(Debug, Error)]
pub enum JobError {
    /// The download failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Compressing or splitting the file failed.
    #[error(transparent)]
    Package(#[from] PackageError),

    /// The per-job workspace could not be managed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// The transport could not deliver a reply or file.
    #[error(transparent)]
    Delivery(#[from] TransportError),

    /// The finished file is over the fetch ceiling.
    #[error("file is {size_bytes} bytes, over the {limit_bytes} byte limit")]
    TooLarge {
        /// Actual size on disk.
        size_bytes: u64,
        /// Configured ceiling.
        limit_bytes: u64,
    },
}

impl JobError {
    /// The reply text shown to the requester for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Download(DownloadError::TooLarge { limit_bytes, .. })
            | Self::TooLarge { limit_bytes, .. } => {
                messages::too_large(*limit_bytes / BYTES_PER_MB)
            }
            Self::Download(_) => messages::DOWNLOAD_FAILED.to_string(),
            _ => messages::PROCESSING_FAILED.to_string(),
        }
    }
}

/// Drives the fetch pipeline for incoming messages.
pub struct JobRunner {
    client: HttpClient,
    transport: Arc<dyn Transport>,
    settings: JobSettings,
}

impl JobRunner {
    /// Creates a runner that downloads with `client` and replies
    /// through `transport`.
    #[must_use]
    pub fn new(client: HttpClient, transport: Arc<dyn Transport>, settings: JobSettings) -> Self {
        Self {
            client,
            transport,
            settings,
        }
    }

    /// Handles one incoming message end to end.
    ///
    /// Pipeline failures, delivery failures included, are reported to
    /// the sender and folded into the returned [`JobStatus`]; only a
    /// failure to send that report surfaces as `Err`, since the sender
    /// cannot be reached at all then.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when a reply could not be sent.
    #[instrument(skip(self, incoming), fields(chat = incoming.chat.0, message = incoming.message.0))]
    pub async fn handle_message(
        &self,
        incoming: &IncomingMessage,
    ) -> Result<JobStatus, TransportError> {
        match parse_command(&incoming.text) {
            Ok(Command::Help) => {
                self.transport
                    .send_text(incoming.chat, &messages::help_text())
                    .await?;
                Ok(JobStatus::Completed)
            }
            Ok(Command::Fetch(request)) => self.run_fetch(incoming, &request).await,
            Err(e @ (CommandError::InvalidUrl { .. } | CommandError::UrlTooLong { .. })) => {
                warn!(error = %e, "rejected message without a usable URL");
                self.transport
                    .send_text(incoming.chat, messages::INVALID_URL)
                    .await?;
                Ok(JobStatus::Rejected)
            }
            Err(e @ CommandError::InvalidPartSize { .. }) => {
                warn!(error = %e, "rejected message with a bad part size");
                self.transport
                    .send_text(incoming.chat, &messages::invalid_part_size())
                    .await?;
                Ok(JobStatus::Rejected)
            }
        }
    }

    /// Runs one fetch job, bracketed by the progress reaction.
    ///
    /// Reaction failures are logged and do not stop the job.
    #[instrument(skip(self, incoming, request), fields(url = %request.url))]
    async fn run_fetch(
        &self,
        incoming: &IncomingMessage,
        request: &FetchRequest,
    ) -> Result<JobStatus, TransportError> {
        if let Err(e) = self
            .transport
            .set_reaction(incoming.chat, incoming.message, messages::PROGRESS_REACTION)
            .await
        {
            warn!(error = %e, "could not set progress reaction, continuing");
        }

        let outcome = self.fetch_and_deliver(incoming, request).await;

        if let Err(e) = self
            .transport
            .clear_reaction(incoming.chat, incoming.message)
            .await
        {
            warn!(error = %e, "could not clear progress reaction");
        }

        match outcome {
            Ok(()) => Ok(JobStatus::Completed),
            Err(e) => {
                error!(error = %e, "job failed");
                self.transport
                    .send_text(incoming.chat, &e.user_message())
                    .await?;
                Ok(JobStatus::Failed)
            }
        }
    }

    /// Creates the workspace, runs the pipeline, and destroys the
    /// workspace whatever the pipeline returned.
    async fn fetch_and_deliver(
        &self,
        incoming: &IncomingMessage,
        request: &FetchRequest,
    ) -> Result<(), JobError> {
        let workspace = Workspace::create(&self.settings.workspace_root).await?;

        let result = self.run_pipeline(incoming, request, workspace.path()).await;

        if let Err(e) = workspace.destroy().await {
            warn!(error = %e, "could not destroy workspace");
        }
        result
    }

    /// Download, classify, size-check, package, deliver.
    async fn run_pipeline(
        &self,
        incoming: &IncomingMessage,
        request: &FetchRequest,
        dir: &Path,
    ) -> Result<(), JobError> {
        let fetched = self
            .client
            .fetch_to_dir(&request.url, dir, self.settings.max_file_bytes)
            .await?;

        // Classification is best effort: a failed sniff or rename keeps
        // the derived name and the job continues.
        let path = match ensure_suffix(&fetched.path).await {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "classification failed, keeping original name");
                fetched.path.clone()
            }
        };
        let file = FetchedFile {
            path,
            size_bytes: fetched.size_bytes,
        };

        if file.size_bytes > self.settings.max_file_bytes {
            return Err(JobError::TooLarge {
                size_bytes: file.size_bytes,
                limit_bytes: self.settings.max_file_bytes,
            });
        }

        let unit = package_file(&file, request.part_size_bytes()).await?;
        for path in unit.paths() {
            self.transport.send_file(incoming.chat, path).await?;
        }

        info!(
            transport = self.transport.name(),
            deliveries = unit.paths().len(),
            "job delivered"
        );
        Ok(())
    }
}
