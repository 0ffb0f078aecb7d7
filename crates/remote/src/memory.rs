//! In-process remote store.
//!
//! Mirrors the CGI contract closely enough to drive the whole pipeline
//! without a server: offset-checked appends, recursive deletes, hidden
//! names filtered out of listings. Every request is recorded in arrival
//! order so callers can assert on what was sent.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use remotefm_protocol::{InfoQuery, InfoResponse, NodeKind, NodeProps, StatusResponse, path_query};
use tracing::debug;

use crate::api::{RemoteApi, RemoteFuture};
use crate::error::RemoteError;

/// A request received by [`MemoryRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    Info(Vec<String>),
    Put { path: String, offset: u64, len: usize },
    Get(String),
    Delete(String),
}

#[derive(Debug, Clone)]
enum MemNode {
    Dir { mtime: i64 },
    File { data: Vec<u8>, mtime: i64 },
}

#[derive(Debug, Default)]
struct Store {
    nodes: BTreeMap<String, MemNode>,
    readonly: BTreeSet<String>,
    rejected_puts: BTreeSet<String>,
    requests: Vec<RemoteRequest>,
    clock: i64,
}

/// In-memory implementation of [`RemoteApi`].
#[derive(Debug)]
pub struct MemoryRemote {
    inner: Mutex<Store>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    /// Creates a store holding only the root directory.
    pub fn new() -> Self {
        let mut store = Store::default();
        store.nodes.insert("/".into(), MemNode::Dir { mtime: 0 });
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Adds a directory (and any missing parents).
    pub fn with_dir(self, path: &str) -> Self {
        self.store().mkdir_all(&normalize(path));
        self
    }

    /// Adds a file (and any missing parent directories).
    pub fn with_file(self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        let key = normalize(path);
        let mut store = self.store();
        store.mkdir_all(&parent_key(&key));
        let mtime = store.tick();
        store.nodes.insert(
            key,
            MemNode::File {
                data: data.into(),
                mtime,
            },
        );
        drop(store);
        self
    }

    /// Flags `path` as not writable.
    pub fn with_readonly(self, path: &str) -> Self {
        self.store().readonly.insert(normalize(path));
        self
    }

    /// Makes every `put` to `path` fail with a rejection response.
    pub fn reject_puts_to(&self, path: &str) {
        self.store().rejected_puts.insert(normalize(path));
    }

    /// Removes `path` behind the client's back (no request is recorded).
    pub fn remove_silently(&self, path: &str) {
        self.store().remove_tree(&normalize(path));
    }

    /// Content of a stored file.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.store().nodes.get(&normalize(path)) {
            Some(MemNode::File { data, .. }) => Some(data.clone()),
            _ => None,
        }
    }

    /// Whether `path` exists.
    pub fn exists(&self, path: &str) -> bool {
        self.store().nodes.contains_key(&normalize(path))
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.store().requests.clone()
    }

    /// Forgets the recorded requests.
    pub fn clear_requests(&self) {
        self.store().requests.clear();
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RemoteApi for MemoryRemote {
    fn info<'a>(&'a self, query: &'a InfoQuery) -> RemoteFuture<'a, InfoResponse> {
        let resp = self.store().info(query.paths());
        Box::pin(async move { Ok(resp) })
    }

    fn put<'a>(
        &'a self,
        path: &'a str,
        offset: u64,
        data: &'a [u8],
    ) -> RemoteFuture<'a, StatusResponse> {
        let resp = self.store().put(path, offset, data);
        Box::pin(async move { Ok(resp) })
    }

    fn get<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, Vec<u8>> {
        let result = self.store().get(path);
        Box::pin(async move { result })
    }

    fn delete<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, StatusResponse> {
        let resp = self.store().delete(path);
        Box::pin(async move { Ok(resp) })
    }

    fn download_url(&self, path: &str) -> String {
        format!("memory:///get?{}", path_query(path))
    }
}

impl Store {
    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }

    fn mkdir_all(&mut self, key: &str) {
        if key == "/" || self.nodes.contains_key(key) {
            return;
        }
        self.mkdir_all(&parent_key(key));
        let mtime = self.tick();
        self.nodes.insert(key.to_string(), MemNode::Dir { mtime });
    }

    fn remove_tree(&mut self, key: &str) -> Vec<String> {
        let prefix = format!("{key}/");
        let doomed: Vec<String> = self
            .nodes
            .keys()
            .filter(|k| *k == key || k.starts_with(&prefix))
            .cloned()
            .collect();
        for k in &doomed {
            self.nodes.remove(k);
        }
        doomed
    }

    fn kids(&self, key: &str) -> Vec<String> {
        let prefix = if key == "/" {
            "/".to_string()
        } else {
            format!("{key}/")
        };
        self.nodes
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/') && !rest.starts_with('.'))
            .map(str::to_string)
            .collect()
    }

    fn is_writable(&self, key: &str) -> bool {
        !self.readonly.contains(key) && !self.readonly.contains(&parent_key(key))
    }

    fn info(&mut self, paths: &[String]) -> InfoResponse {
        self.requests.push(RemoteRequest::Info(paths.to_vec()));
        let requested: Vec<String> = if paths.is_empty() {
            vec![String::new()]
        } else {
            paths.to_vec()
        };

        let mut found = Vec::new();
        for requested_path in requested {
            let key = normalize(&requested_path);
            if key.contains("/.") {
                continue;
            }
            let Some(node) = self.nodes.get(&key) else {
                continue;
            };
            let mut props = match node {
                MemNode::Dir { mtime } => {
                    let mut p = NodeProps::new(requested_path.clone(), NodeKind::Dir)
                        .with_attr("mtime", *mtime);
                    p.kids = Some(self.kids(&key));
                    p
                }
                MemNode::File { data, mtime } => {
                    NodeProps::new(requested_path.clone(), NodeKind::File)
                        .with_attr("mtime", *mtime)
                        .with_attr("length", data.len() as u64)
                }
            };
            if !self.is_writable(&key) {
                props = props.with_attr("readonly", true);
            }
            found.push(props);
        }
        debug!(requested = paths.len(), found = found.len(), "memory info");
        InfoResponse::ok(found)
    }

    fn put(&mut self, path: &str, offset: u64, data: &[u8]) -> StatusResponse {
        self.requests.push(RemoteRequest::Put {
            path: path.to_string(),
            offset,
            len: data.len(),
        });
        let key = normalize(path);
        if !is_valid_name(&key) {
            return StatusResponse::failed(format!("invalid path \"{path}\""));
        }
        if self.rejected_puts.contains(&key) || !self.is_writable(&key) {
            return StatusResponse::failed("not writable");
        }

        if offset == 0 {
            if matches!(self.nodes.get(&key), Some(MemNode::Dir { .. })) {
                return StatusResponse::failed("not a file");
            }
            self.mkdir_all(&parent_key(&key));
            let mtime = self.tick();
            self.nodes.insert(
                key,
                MemNode::File {
                    data: data.to_vec(),
                    mtime,
                },
            );
            return StatusResponse::ok();
        }

        let mtime = self.tick();
        match self.nodes.get_mut(&key) {
            Some(MemNode::File {
                data: existing,
                mtime: file_mtime,
            }) => {
                if existing.len() as u64 != offset {
                    return StatusResponse::failed(format!(
                        "offset {offset} should be {}",
                        existing.len()
                    ));
                }
                existing.extend_from_slice(data);
                *file_mtime = mtime;
                StatusResponse::ok()
            }
            Some(MemNode::Dir { .. }) => StatusResponse::failed("not a file"),
            None => StatusResponse::failed(format!("offset {offset} should be 0")),
        }
    }

    fn get(&mut self, path: &str) -> Result<Vec<u8>, RemoteError> {
        self.requests.push(RemoteRequest::Get(path.to_string()));
        match self.nodes.get(&normalize(path)) {
            Some(MemNode::File { data, .. }) => Ok(data.clone()),
            _ => Err(RemoteError::Api {
                status: 404,
                body: format!("get stat \"{path}\": not found"),
            }),
        }
    }

    fn delete(&mut self, path: &str) -> StatusResponse {
        self.requests.push(RemoteRequest::Delete(path.to_string()));
        let key = normalize(path);
        if !is_valid_name(&key) {
            return StatusResponse::failed(format!("invalid path \"{path}\""));
        }
        if !self.nodes.contains_key(&key) {
            return StatusResponse::failed(format!("traverse stat \"{path}\": not found"));
        }
        if !self.is_writable(&key) {
            return StatusResponse::failed(format!("delete not writable \"{path}\""));
        }
        let removed = self.remove_tree(&key);
        StatusResponse {
            ok: true,
            msg: None,
            paths: removed,
        }
    }
}

/// Canonical key: leading `/`, no trailing `/` except for the root.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn parent_key(key: &str) -> String {
    match key.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => key[..idx].to_string(),
    }
}

fn is_valid_name(key: &str) -> bool {
    key != "/" && !key.contains("/.")
}
