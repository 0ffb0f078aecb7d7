//! Chunked upload of a single file.

use remotefm_remote::RemoteApi;
use remotefm_transfer::{CHUNK_SIZE, ChunkCursor, StatusEvent, StatusSink, validate_remote_path};
use tracing::debug;

use crate::error::UploadError;
use crate::types::UploadJob;

/// Sends one file at a time as sequential offset-addressed `put` requests.
///
/// Only one chunk is ever in flight: chunk N+1 is sent after chunk N's
/// response has been observed.
pub struct ChunkedUploader<'a> {
    remote: &'a dyn RemoteApi,
    status: &'a dyn StatusSink,
    chunk_size: usize,
}

impl<'a> ChunkedUploader<'a> {
    pub fn new(remote: &'a dyn RemoteApi, status: &'a dyn StatusSink) -> Self {
        Self {
            remote,
            status,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Overrides the chunk size; 0 keeps [`CHUNK_SIZE`].
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        if chunk_size > 0 {
            self.chunk_size = chunk_size;
        }
        self
    }

    /// Uploads `job`, returning the number of content bytes sent.
    ///
    /// The file is read once. After each acknowledged chunk a progress
    /// event is logged; a zero-byte file sends nothing and is reported
    /// complete right away. Any error abandons the file without retry.
    pub async fn upload(&self, job: &UploadJob) -> Result<u64, UploadError> {
        let path = job.target_path.as_str();
        validate_remote_path(path)?;

        let content = job.entry.read().await.map_err(|source| UploadError::Read {
            path: path.to_string(),
            source,
        })?;
        let mut cursor = ChunkCursor::with_chunk_size(content, self.chunk_size);
        let label = format!("Uploading \"{path}\"");

        if cursor.is_complete() {
            debug!(path = %path, "empty file, nothing to send");
            self.status.log(StatusEvent::progress(label, cursor.progress()));
            return Ok(0);
        }

        while let Some(chunk) = cursor.current() {
            debug!(
                path = %path,
                chunk = chunk.index,
                offset = chunk.offset,
                bytes = chunk.data.len(),
                "sending chunk"
            );
            let resp = self.remote.put(path, chunk.offset, chunk.data).await?;
            if !resp.ok {
                return Err(UploadError::Rejected {
                    path: path.to_string(),
                    msg: resp.reason_or("rejected by server"),
                });
            }
            let progress = cursor.advance();
            self.status.log(StatusEvent::progress(label.clone(), progress));
        }

        Ok(cursor.total_bytes())
    }
}
