//! Chunked upload primitives with progress reporting.
//!
//! A file's content is read once and walked in fixed-size chunks; each
//! chunk is addressed by its byte offset so the remote side can append it
//! with an offset-checked write.

mod chunked;
mod progress;
mod validation;

pub use chunked::{Chunk, ChunkCursor};
pub use progress::{StatusEvent, StatusKind, StatusSink, progress_fraction};
pub use validation::validate_remote_path;

/// Chunk size used for every `put` request: 32 KiB.
///
/// Fixed; the remote API has no negotiation step.
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid path: {0}")]
    InvalidPath(String),
}
