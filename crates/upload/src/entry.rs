//! Local file-system entries handed over by a drop.
//!
//! [`EntryHandle`] abstracts the entry source so the walker works the same
//! over the real file system ([`FsEntry`]) and over test doubles.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// Boxed future returned by [`EntryHandle`] reads.
pub type EntryFuture<'a, T> = Pin<Box<dyn Future<Output = io::Result<T>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A local file or directory that can be uploaded.
pub trait EntryHandle: Send + Sync {
    /// Base name, used as the remote name.
    fn name(&self) -> &str;

    fn kind(&self) -> EntryKind;

    /// Reads the whole file content.
    fn read(&self) -> EntryFuture<'_, Vec<u8>>;

    /// Lists a directory's children.
    fn read_children(&self) -> EntryFuture<'_, Vec<Box<dyn EntryHandle>>>;
}

/// An entry backed by a local path.
#[derive(Debug, Clone)]
pub struct FsEntry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
}

impl FsEntry {
    /// Opens `path`, following symlinks.
    ///
    /// Fails if the path does not exist or is neither a file nor a
    /// directory.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file or directory: {}", path.display()),
            ));
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path has no file name: {}", path.display()),
                )
            })?;
        Ok(Self { path, name, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntryHandle for FsEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntryKind {
        self.kind
    }

    fn read(&self) -> EntryFuture<'_, Vec<u8>> {
        Box::pin(tokio::fs::read(&self.path))
    }

    fn read_children(&self) -> EntryFuture<'_, Vec<Box<dyn EntryHandle>>> {
        Box::pin(async move {
            let mut dir = tokio::fs::read_dir(&self.path).await?;
            let mut children = Vec::new();
            while let Some(entry) = dir.next_entry().await? {
                let path = entry.path();
                let child = match FsEntry::open(&path).await {
                    Ok(child) => child,
                    // Broken symlinks, sockets and the like are not uploadable.
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "skipping entry");
                        continue;
                    }
                };
                // A linked directory may point back at an ancestor.
                if child.kind == EntryKind::Directory && entry.file_type().await?.is_symlink() {
                    tracing::debug!(path = %path.display(), "skipping symlinked directory");
                    continue;
                }
                children.push(child);
            }
            // read_dir order is platform dependent.
            children.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(children
                .into_iter()
                .map(|c| Box::new(c) as Box<dyn EntryHandle>)
                .collect())
        })
    }
}
