//! Upload error types.

use remotefm_remote::RemoteError;
use remotefm_transfer::TransferError;

/// Why a single upload job was abandoned.
///
/// Never fatal to a transfer: the orchestrator reports it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("{msg}")]
    Rejected { path: String, msg: String },

    #[error("{0}")]
    InvalidPath(#[from] TransferError),
}
