//! Upload pipeline for dropped local entries.
//!
//! This crate turns a drop of local files and directories into a strictly
//! sequential series of chunked `put` requests. It has no view
//! dependencies: the panel supplies a [`Refresher`] that reconciles the
//! rendered tree after each file and directory completes.
//!
//! # Pipeline
//!
//! 1. **Walk** - expand directories depth-first into upload jobs
//! 2. **Upload** - read each file once, send 32 KiB chunks by offset
//! 3. **Refresh** - reconcile each uploaded path and finished directory
//! 4. **Complete** - report the destination and fire the completion callback

pub mod entry;
pub mod error;
pub mod orchestrator;
pub mod types;
pub mod uploader;
pub mod walker;

pub use entry::{EntryFuture, EntryHandle, EntryKind, FsEntry};
pub use error::UploadError;
pub use orchestrator::{CompletionCallback, Refresher, TransferOrchestrator};
pub use types::{LocalEntry, TransferSummary, UploadJob};
pub use uploader::ChunkedUploader;
pub use walker::{WalkStep, Walker};
