//! Remote API error types.

/// Errors produced while talking to the remote API.
///
/// A well-formed `{"ok": false}` answer is not an error at this level; it
/// is returned to the caller as a response with `ok == false`.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
