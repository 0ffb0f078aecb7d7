//! Shared upload types.

use crate::entry::EntryHandle;

/// A dropped entry together with the remote directory it goes into.
pub struct LocalEntry {
    pub handle: Box<dyn EntryHandle>,
    /// Destination directory, slash-terminated.
    pub target: String,
}

impl LocalEntry {
    /// Full remote path of the entry (`target` + name).
    pub fn remote_path(&self) -> String {
        format!("{}{}", self.target, self.handle.name())
    }
}

/// One file ready to upload.
pub struct UploadJob {
    pub entry: Box<dyn EntryHandle>,
    /// Full remote path of the file.
    pub target_path: String,
}

impl UploadJob {
    pub fn name(&self) -> &str {
        self.entry.name()
    }
}

impl std::fmt::Debug for UploadJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadJob")
            .field("target_path", &self.target_path)
            .finish_non_exhaustive()
    }
}

/// Outcome counters of one transfer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferSummary {
    /// Files whose every chunk was acknowledged.
    pub uploaded: usize,
    /// Files or directories that were abandoned.
    pub failed: usize,
    /// Directories fully walked.
    pub directories: usize,
    /// Content bytes acknowledged by the remote.
    pub bytes: u64,
}
