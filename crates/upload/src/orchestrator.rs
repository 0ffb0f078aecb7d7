//! Transfer orchestration: walker, uploader and refreshes in sequence.

use std::future::Future;
use std::pin::Pin;

use remotefm_protocol::paths::ensure_trailing_slash;
use remotefm_remote::RemoteApi;
use remotefm_transfer::{StatusEvent, StatusSink};
use tracing::{info, warn};

use crate::entry::EntryHandle;
use crate::error::UploadError;
use crate::types::TransferSummary;
use crate::uploader::ChunkedUploader;
use crate::walker::{WalkStep, Walker};

/// Reconciles remote paths into the rendered view.
///
/// Implemented by the panel; names may be absolute or relative to the
/// displayed directory.
pub trait Refresher: Send + Sync {
    fn refresh<'a>(&'a self, names: Vec<String>) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Invoked once when a transfer has drained its whole queue.
pub type CompletionCallback = Box<dyn FnOnce(&TransferSummary) + Send>;

/// Runs one drop: exactly one file in flight at a time, in walk order.
pub struct TransferOrchestrator<'a> {
    remote: &'a dyn RemoteApi,
    refresher: &'a dyn Refresher,
    status: &'a dyn StatusSink,
}

impl<'a> TransferOrchestrator<'a> {
    pub fn new(
        remote: &'a dyn RemoteApi,
        refresher: &'a dyn Refresher,
        status: &'a dyn StatusSink,
    ) -> Self {
        Self {
            remote,
            refresher,
            status,
        }
    }

    /// Uploads `entries` into `destination`.
    ///
    /// Each uploaded file and each fully walked directory is refreshed as
    /// soon as it completes. Failures are reported through the status sink
    /// and never stop the queue. When the queue is drained the destination
    /// is shown as a breadcrumb and `on_complete` is called.
    pub async fn run(
        &self,
        entries: Vec<Box<dyn EntryHandle>>,
        destination: &str,
        on_complete: Option<CompletionCallback>,
    ) -> TransferSummary {
        let destination = ensure_trailing_slash(destination);
        let uploader = ChunkedUploader::new(self.remote, self.status);
        let mut walker = Walker::new(entries, &destination);
        let mut summary = TransferSummary::default();

        while let Some(step) = walker.next().await {
            match step {
                WalkStep::Upload(job) => match uploader.upload(&job).await {
                    Ok(bytes) => {
                        summary.uploaded += 1;
                        summary.bytes += bytes;
                        self.refresher.refresh(vec![job.target_path]).await;
                    }
                    Err(e) => {
                        summary.failed += 1;
                        warn!(path = %job.target_path, error = %e, "upload abandoned");
                        let message = match &e {
                            UploadError::Read { path, source } => {
                                format!("Load failed with {source} ({path})")
                            }
                            other => format!("Upload failed with {other}"),
                        };
                        self.status.log(StatusEvent::error(message));
                    }
                },
                WalkStep::DirectoryDone(path) => {
                    summary.directories += 1;
                    self.refresher.refresh(vec![path]).await;
                }
                WalkStep::Unreadable { path, error } => {
                    summary.failed += 1;
                    self.status.log(StatusEvent::error(format!(
                        "Load failed with {error} ({path})"
                    )));
                }
            }
        }

        info!(
            destination = %destination,
            uploaded = summary.uploaded,
            failed = summary.failed,
            bytes = summary.bytes,
            "transfer complete"
        );
        self.status.log(StatusEvent::breadcrumb(destination));
        if let Some(callback) = on_complete {
            callback(&summary);
        }
        summary
    }
}
