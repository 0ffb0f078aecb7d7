//! Panel error types.

use remotefm_remote::RemoteError;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("{0} is read-only")]
    ReadOnly(String),

    #[error("no directory is displayed")]
    NoDirectory,

    #[error("no such entry: {0}")]
    UnknownNode(String),
}
