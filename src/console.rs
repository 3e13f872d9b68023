//! Console transport: replies on stdout, attachments into a directory.
//!
//! Stands in for a chat backend when running from a terminal. Text
//! replies print to stdout, delivered files are copied into the output
//! directory, and the progress reaction shows as a spinner.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use downbot_core::download::resolve_unique_path;
use downbot_core::{ChatId, MessageId, Transport, TransportError};
use indicatif::{ProgressBar, ProgressStyle};

pub struct ConsoleTransport {
    output_dir: PathBuf,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleTransport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            spinner: Mutex::new(None),
        }
    }

    fn spinner_slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.spinner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prints a line to stdout without tearing an active spinner.
    fn emit(&self, line: &str) {
        let guard = self.spinner_slot();
        if let Some(spinner) = guard.as_ref() {
            spinner.suspend(|| println!("{line}"));
        } else {
            println!("{line}");
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send_text(&self, _chat: ChatId, text: &str) -> Result<(), TransportError> {
        self.emit(text);
        Ok(())
    }

    async fn send_file(&self, _chat: ChatId, path: &Path) -> Result<(), TransportError> {
        let Some(file_name) = path.file_name() else {
            return Err(TransportError::delivery(
                "send file",
                format!("{} has no file name", path.display()),
            ));
        };

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| TransportError::delivery("send file", e.to_string()))?;

        // A repeated delivery of the same name must not clobber the
        // earlier file, so resolve a free destination before copying.
        let dest = resolve_unique_path(&self.output_dir, &file_name.to_string_lossy());
        let bytes = tokio::fs::copy(path, &dest)
            .await
            .map_err(|e| TransportError::delivery("send file", e.to_string()))?;

        self.emit(&format!("delivered {} ({bytes} bytes)", dest.display()));
        Ok(())
    }

    async fn set_reaction(
        &self,
        _chat: ChatId,
        _message: MessageId,
        reaction: &str,
    ) -> Result<(), TransportError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(reaction.to_string());

        *self.spinner_slot() = Some(spinner);
        Ok(())
    }

    async fn clear_reaction(
        &self,
        _chat: ChatId,
        _message: MessageId,
    ) -> Result<(), TransportError> {
        if let Some(spinner) = self.spinner_slot().take() {
            spinner.finish_and_clear();
        }
        Ok(())
    }
}
