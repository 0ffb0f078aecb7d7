//! Tree reconciliation: merges `info` answers into the displayed directory.

use std::collections::BTreeSet;
use std::sync::Mutex;

use remotefm_protocol::paths::{is_direct_child, resolve};
use remotefm_protocol::{InfoBatcher, InfoQuery};
use remotefm_remote::RemoteApi;
use remotefm_view::{DirectoryState, ViewSurface};
use tracing::{debug, trace, warn};

use crate::lock_state;

/// Refreshes named paths of the displayed directory.
pub struct Reconciler<'a> {
    remote: &'a dyn RemoteApi,
    state: &'a Mutex<DirectoryState>,
    surface: &'a dyn ViewSurface,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        remote: &'a dyn RemoteApi,
        state: &'a Mutex<DirectoryState>,
        surface: &'a dyn ViewSurface,
    ) -> Self {
        Self {
            remote,
            state,
            surface,
        }
    }

    /// Refreshes `names`, absolute or relative to the displayed directory.
    ///
    /// Only direct children of the displayed directory are queried, in
    /// batches bounded by the `info` query length. Each reported path is
    /// materialized; a requested path missing from its batch's answer is
    /// removed. Nodes that were not requested are never touched.
    pub async fn refresh(&self, names: &[String]) {
        let (dir, generation) = {
            let state = lock_state(self.state);
            match state.path() {
                Some(dir) => (dir.to_string(), state.generation()),
                None => {
                    trace!("refresh before any directory is displayed");
                    return;
                }
            }
        };

        let mut batcher = InfoBatcher::new();
        for name in names {
            let path = resolve(name, &dir);
            if !is_direct_child(&path, &dir) {
                trace!(path = %path, dir = %dir, "not in displayed directory");
                continue;
            }
            if let Some(query) = batcher.push(path) {
                self.apply(&query, generation).await;
            }
        }
        if let Some(query) = batcher.finish() {
            self.apply(&query, generation).await;
        }
    }

    async fn apply(&self, query: &InfoQuery, generation: u64) {
        let resp = match self.remote.info(query).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(paths = query.paths().len(), error = %e, "info request failed");
                return;
            }
        };
        if !resp.ok {
            warn!(msg = ?resp.msg, "info rejected");
            return;
        }

        let mut state = lock_state(self.state);
        if state.generation() != generation {
            debug!(
                requested = generation,
                current = state.generation(),
                "discarding stale info response"
            );
            return;
        }

        let mut missing: BTreeSet<&str> = query.paths().iter().map(String::as_str).collect();
        for props in &resp.paths {
            if !missing.remove(props.path.as_str()) {
                trace!(path = %props.path, "unrequested path in info response");
                continue;
            }
            state.materialize(props, self.surface);
        }
        for path in missing {
            if state.remove(path, self.surface).is_some() {
                debug!(path = %path, "removed vanished node");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSurface;
    use remotefm_protocol::{NodeKind, NodeProps};
    use remotefm_remote::{MemoryRemote, RemoteRequest};

    fn displayed(dir: &str, surface: &RecordingSurface) -> Mutex<DirectoryState> {
        let mut state = DirectoryState::new(None);
        state.enter(&NodeProps::new(dir, NodeKind::Dir), surface);
        surface.take();
        Mutex::new(state)
    }

    fn names(state: &Mutex<DirectoryState>) -> Vec<String> {
        lock_state(state)
            .children()
            .map(|n| n.name().to_string())
            .collect()
    }

    fn info_requests(remote: &MemoryRemote) -> Vec<Vec<String>> {
        remote
            .requests()
            .into_iter()
            .filter_map(|r| match r {
                RemoteRequest::Info(paths) => Some(paths),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn relative_names_resolve_against_directory() {
        let remote = MemoryRemote::new().with_file("/docs/a.txt", "A");
        let surface = RecordingSurface::default();
        let state = displayed("/docs/", &surface);

        Reconciler::new(&remote, &state, &surface)
            .refresh(&["a.txt".to_string()])
            .await;

        assert_eq!(names(&state), vec!["a.txt"]);
        assert_eq!(info_requests(&remote), vec![vec!["/docs/a.txt".to_string()]]);
    }

    #[tokio::test]
    async fn foreign_paths_are_filtered_out() {
        let remote = MemoryRemote::new().with_file("/docs/sub/deep.txt", "D");
        let surface = RecordingSurface::default();
        let state = displayed("/docs/", &surface);

        Reconciler::new(&remote, &state, &surface)
            .refresh(&[
                "/other/x.txt".to_string(),
                "/docs/sub/deep.txt".to_string(),
                "/docs/".to_string(),
            ])
            .await;

        assert!(remote.requests().is_empty());
        assert!(surface.take().is_empty());
    }

    #[tokio::test]
    async fn second_refresh_is_a_no_op() {
        let remote = MemoryRemote::new().with_file("/docs/a.txt", "A");
        let surface = RecordingSurface::default();
        let state = displayed("/docs/", &surface);
        let reconciler = Reconciler::new(&remote, &state, &surface);

        reconciler.refresh(&["/docs/a.txt".to_string()]).await;
        assert_eq!(surface.take(), vec!["insert 0 /docs/a.txt"]);

        reconciler.refresh(&["/docs/a.txt".to_string()]).await;
        assert!(surface.take().is_empty());
        assert_eq!(info_requests(&remote).len(), 2);
    }

    #[tokio::test]
    async fn missing_paths_are_removed_only_if_requested() {
        let remote = MemoryRemote::new()
            .with_file("/docs/a.txt", "A")
            .with_file("/docs/b.txt", "B");
        let surface = RecordingSurface::default();
        let state = displayed("/docs/", &surface);
        let reconciler = Reconciler::new(&remote, &state, &surface);
        reconciler
            .refresh(&["a.txt".to_string(), "b.txt".to_string()])
            .await;

        remote.remove_silently("/docs/a.txt");
        remote.remove_silently("/docs/b.txt");
        surface.take();

        reconciler.refresh(&["a.txt".to_string()]).await;
        assert_eq!(names(&state), vec!["b.txt"]);
        assert_eq!(surface.take(), vec!["remove /docs/a.txt"]);
    }

    #[tokio::test]
    async fn long_input_is_split_into_batches() {
        let mut remote = MemoryRemote::new();
        let names: Vec<String> = (0..40)
            .map(|i| format!("a-rather-long-file-name-number-{i:02}.txt"))
            .collect();
        for name in &names {
            remote = remote.with_file(&format!("/docs/{name}"), "x");
        }
        let surface = RecordingSurface::default();
        let state = displayed("/docs/", &surface);

        Reconciler::new(&remote, &state, &surface)
            .refresh(&names)
            .await;

        let batches = info_requests(&remote);
        assert!(batches.len() > 1);
        assert_eq!(batches.iter().map(Vec::len).sum::<usize>(), 40);
        assert_eq!(lock_state(&state).len(), 40);
    }

    #[tokio::test]
    async fn nothing_displayed_means_nothing_sent() {
        let remote = MemoryRemote::new().with_file("/a.txt", "A");
        let surface = RecordingSurface::default();
        let state = Mutex::new(DirectoryState::new(None));

        Reconciler::new(&remote, &state, &surface)
            .refresh(&["/a.txt".to_string()])
            .await;

        assert!(remote.requests().is_empty());
    }
}
