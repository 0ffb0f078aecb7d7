//! The remote API trait.

use std::future::Future;
use std::pin::Pin;

use remotefm_protocol::{InfoQuery, InfoResponse, StatusResponse};

use crate::error::RemoteError;

/// Boxed future returned by [`RemoteApi`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// Abstract connection to the remote file store.
///
/// Using a trait keeps the transfer and reconcile logic decoupled from
/// HTTP and testable against [`MemoryRemote`](crate::MemoryRemote).
pub trait RemoteApi: Send + Sync {
    /// Fetches metadata for every path in `query` that still exists.
    fn info<'a>(&'a self, query: &'a InfoQuery) -> RemoteFuture<'a, InfoResponse>;

    /// Writes `data` into `path` at byte `offset`.
    fn put<'a>(&'a self, path: &'a str, offset: u64, data: &'a [u8])
    -> RemoteFuture<'a, StatusResponse>;

    /// Downloads the raw content of `path`.
    fn get<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, Vec<u8>>;

    /// Deletes `path` (recursively for directories).
    fn delete<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, StatusResponse>;

    /// URL a front-end can hand to its own downloader for `path`.
    fn download_url(&self, path: &str) -> String;
}
