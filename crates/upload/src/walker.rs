//! Depth-first expansion of dropped entries into upload jobs.
//!
//! The walker keeps an explicit stack of frames, one per directory level
//! being drained, so arbitrarily deep trees never grow the call stack.

use std::collections::VecDeque;

use remotefm_protocol::paths::ensure_trailing_slash;
use tracing::{debug, warn};

use crate::entry::{EntryHandle, EntryKind};
use crate::types::{LocalEntry, UploadJob};

/// One unit of work produced by [`Walker::next`].
#[derive(Debug)]
pub enum WalkStep {
    /// A file to upload.
    Upload(UploadJob),
    /// Every entry below this remote directory path has been produced.
    DirectoryDone(String),
    /// A directory could not be listed; its subtree is skipped.
    Unreadable { path: String, error: std::io::Error },
}

struct Frame {
    pending: VecDeque<LocalEntry>,
    /// Remote path of the directory this frame expands, `None` for the
    /// dropped entries themselves.
    directory: Option<String>,
}

/// Produces upload jobs one at a time, depth-first, in drop order.
///
/// A directory's children are listed when it is reached and fully drained,
/// nested subdirectories included, before its next sibling.
pub struct Walker {
    stack: Vec<Frame>,
}

impl Walker {
    /// Starts a walk of `entries` dropped into `destination`.
    pub fn new(entries: Vec<Box<dyn EntryHandle>>, destination: &str) -> Self {
        let target = ensure_trailing_slash(destination);
        let pending = entries
            .into_iter()
            .map(|handle| LocalEntry {
                handle,
                target: target.clone(),
            })
            .collect();
        Self {
            stack: vec![Frame {
                pending,
                directory: None,
            }],
        }
    }

    /// Number of directory levels still open, the root level included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the next step, or `None` once everything has been walked.
    pub async fn next(&mut self) -> Option<WalkStep> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(entry) = frame.pending.pop_front() else {
                let done = self.stack.pop()?;
                match done.directory {
                    Some(path) => return Some(WalkStep::DirectoryDone(path)),
                    None => continue,
                }
            };

            let path = entry.remote_path();
            match entry.handle.kind() {
                EntryKind::File => {
                    return Some(WalkStep::Upload(UploadJob {
                        entry: entry.handle,
                        target_path: path,
                    }));
                }
                EntryKind::Directory => match entry.handle.read_children().await {
                    Ok(children) => {
                        debug!(path = %path, children = children.len(), "entering directory");
                        let target = format!("{path}/");
                        let pending = children
                            .into_iter()
                            .map(|handle| LocalEntry {
                                handle,
                                target: target.clone(),
                            })
                            .collect();
                        self.stack.push(Frame {
                            pending,
                            directory: Some(path),
                        });
                    }
                    Err(error) => {
                        warn!(path = %path, error = %error, "cannot list directory");
                        return Some(WalkStep::Unreadable { path, error });
                    }
                },
            }
        }
    }
}
