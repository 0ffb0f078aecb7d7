//! The file manager facade driven by the front-end.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use remotefm_protocol::paths::ensure_trailing_slash;
use remotefm_remote::RemoteApi;
use remotefm_transfer::{StatusEvent, StatusKind, StatusSink};
use remotefm_upload::{
    CompletionCallback, EntryHandle, Refresher, TransferOrchestrator, TransferSummary,
};
use remotefm_view::{
    Comparator, DirectoryState, DownloadRequest, NodeAction, SortOrder, ViewNode, ViewSurface,
};
use tracing::{debug, info, warn};

use crate::error::PanelError;
use crate::lock_state;
use crate::navigate::Navigator;
use crate::reconcile::Reconciler;

/// Builder for [`FileManager`].
pub struct FileManagerBuilder {
    remote: Arc<dyn RemoteApi>,
    surface: Arc<dyn ViewSurface>,
    status: Option<Arc<dyn StatusSink>>,
    comparator: Option<Comparator>,
}

impl FileManagerBuilder {
    /// Receiver of user-visible status messages.
    pub fn status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = Some(status);
        self
    }

    /// Ordering for newly inserted nodes; appended in arrival order if unset.
    pub fn comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.comparator = order.comparator();
        self
    }

    pub fn build(self) -> FileManager {
        FileManager {
            id: uuid::Uuid::new_v4().to_string(),
            remote: self.remote,
            surface: self.surface,
            status: self.status,
            state: Mutex::new(DirectoryState::new(self.comparator)),
        }
    }
}

/// One file manager panel bound to a remote store.
///
/// Owns the displayed [`DirectoryState`]; the lock around it is never held
/// across a remote call.
pub struct FileManager {
    id: String,
    remote: Arc<dyn RemoteApi>,
    surface: Arc<dyn ViewSurface>,
    status: Option<Arc<dyn StatusSink>>,
    state: Mutex<DirectoryState>,
}

impl FileManager {
    pub fn builder(
        remote: Arc<dyn RemoteApi>,
        surface: Arc<dyn ViewSurface>,
    ) -> FileManagerBuilder {
        FileManagerBuilder {
            remote,
            surface,
            status: None,
            comparator: None,
        }
    }

    /// Unique panel identifier, used in log fields.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Slash-terminated path of the displayed directory.
    pub fn current_path(&self) -> Option<String> {
        lock_state(&self.state).path().map(str::to_string)
    }

    /// Whether the displayed directory is flagged read-only.
    pub fn readonly(&self) -> bool {
        lock_state(&self.state).readonly()
    }

    /// Snapshot of the displayed children in display order.
    pub fn children(&self) -> Vec<ViewNode> {
        lock_state(&self.state).children().cloned().collect()
    }

    pub fn node(&self, path: &str) -> Option<ViewNode> {
        lock_state(&self.state).get(path).cloned()
    }

    // -----------------------------------------------------------------------
    // Front-end events
    // -----------------------------------------------------------------------

    /// Uploads dropped `entries` into `destination`.
    ///
    /// Refused while no directory is displayed or when the destination is
    /// the displayed directory and it is read-only. Otherwise every entry
    /// is attempted and `on_complete` fires once the queue is drained.
    pub async fn on_drop(
        &self,
        entries: Vec<Box<dyn EntryHandle>>,
        destination: &str,
        on_complete: Option<CompletionCallback>,
    ) -> Result<TransferSummary, PanelError> {
        let destination = ensure_trailing_slash(destination);
        let refusal = {
            let state = lock_state(&self.state);
            match state.path() {
                None => Some(PanelError::NoDirectory),
                Some(dir) if dir == destination && state.readonly() => {
                    Some(PanelError::ReadOnly(destination.clone()))
                }
                Some(_) => None,
            }
        };
        if let Some(err) = refusal {
            self.log(StatusEvent::error(format!("Cannot upload: {err}")));
            return Err(err);
        }

        debug!(panel = %self.id, destination = %destination, entries = entries.len(), "drop");
        let summary = TransferOrchestrator::new(self.remote.as_ref(), self, self)
            .run(entries, &destination, on_complete)
            .await;
        Ok(summary)
    }

    /// Navigates to `path`; failures leave the view as it was.
    ///
    /// Returns whether the directory is now displayed.
    pub async fn on_navigate(&self, path: &str) -> bool {
        match self.navigate(path).await {
            Ok(_) => true,
            Err(e) => {
                debug!(panel = %self.id, path = %path, error = %e, "navigation ignored");
                false
            }
        }
    }

    /// Navigates to `path`, reporting why it did not happen.
    ///
    /// Returns whether the displayed path changed.
    pub async fn navigate(&self, path: &str) -> Result<bool, PanelError> {
        Navigator::new(self.remote.as_ref(), &self.state, self.surface.as_ref(), self)
            .navigate(path)
            .await
    }

    /// Deletes `path` remotely, then refreshes it whatever the outcome.
    pub async fn on_delete_request(&self, path: &str) {
        match self.remote.delete(path).await {
            Ok(resp) if resp.ok => {
                debug!(panel = %self.id, path = %path, removed = resp.paths.len(), "deleted");
            }
            Ok(resp) => {
                let reason = resp.reason_or("rejected by server");
                self.log(StatusEvent::error(format!("Delete failed with {reason}")));
            }
            Err(e) => {
                self.log(StatusEvent::error(format!("Delete failed with {e}")));
            }
        }
        self.refresh(vec![path.to_string()]).await;
    }

    /// Performs a displayed node's action: navigation or a download.
    pub async fn on_activate(&self, path: &str) -> Result<(), PanelError> {
        let action = lock_state(&self.state)
            .get(path)
            .map(|node| node.action().clone())
            .ok_or_else(|| PanelError::UnknownNode(path.to_string()))?;

        match action {
            NodeAction::Navigate(target) => {
                self.on_navigate(&target).await;
            }
            NodeAction::Download { path, file_name } => {
                let request = DownloadRequest {
                    url: self.remote.download_url(&path),
                    file_name,
                };
                debug!(panel = %self.id, url = %request.url, "download");
                self.surface.download(&request);
            }
        }
        Ok(())
    }

    /// Whether the node at `path` may be dragged to the trash.
    pub fn on_drag_start(&self, path: &str) -> bool {
        lock_state(&self.state)
            .get(path)
            .is_some_and(ViewNode::draggable)
    }

    /// Fetches a file's raw content through `get`.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, PanelError> {
        Ok(self.remote.get(path).await?)
    }

    /// Refreshes `names`, absolute or relative to the displayed directory.
    pub async fn refresh(&self, names: Vec<String>) {
        Reconciler::new(self.remote.as_ref(), &self.state, self.surface.as_ref())
            .refresh(&names)
            .await;
    }

    /// Reports a status message to the sink and the log.
    pub fn log(&self, event: StatusEvent) {
        match event.kind {
            Some(StatusKind::Error) => warn!(panel = %self.id, "{}", event.message),
            Some(StatusKind::Breadcrumb) => {
                info!(panel = %self.id, path = %event.message, "breadcrumb")
            }
            None => match event.percent() {
                Some(pct) => debug!(panel = %self.id, progress = pct, "{}", event.message),
                None => info!(panel = %self.id, "{}", event.message),
            },
        }
        if let Some(status) = &self.status {
            status.log(event);
        }
    }
}

impl StatusSink for FileManager {
    fn log(&self, event: StatusEvent) {
        FileManager::log(self, event);
    }
}

impl Refresher for FileManager {
    fn refresh<'a>(&'a self, names: Vec<String>) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(FileManager::refresh(self, names))
    }
}

impl std::fmt::Debug for FileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileManager")
            .field("id", &self.id)
            .field("state", &*lock_state(&self.state))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingStatus, RecordingSurface};
    use remotefm_protocol::{InfoQuery, InfoResponse, StatusResponse};
    use remotefm_remote::{MemoryRemote, RemoteError, RemoteFuture, RemoteRequest};
    use remotefm_upload::FsEntry;
    use std::fs;
    use tempfile::TempDir;
    use tokio::sync::Notify;

    struct Fixture {
        remote: Arc<MemoryRemote>,
        surface: Arc<RecordingSurface>,
        status: Arc<RecordingStatus>,
        fm: FileManager,
    }

    fn fixture(remote: MemoryRemote) -> Fixture {
        let remote = Arc::new(remote);
        let surface = Arc::new(RecordingSurface::default());
        let status = Arc::new(RecordingStatus::default());
        let fm = FileManager::builder(remote.clone(), surface.clone())
            .status(status.clone())
            .sort(SortOrder::DirectoriesFirst)
            .build();
        Fixture {
            remote,
            surface,
            status,
            fm,
        }
    }

    fn names(fm: &FileManager) -> Vec<String> {
        fm.children().iter().map(|n| n.name().to_string()).collect()
    }

    async fn file_entry(dir: &TempDir, name: &str, data: &[u8]) -> Box<dyn EntryHandle> {
        let path = dir.path().join(name);
        fs::write(&path, data).unwrap();
        Box::new(FsEntry::open(path).await.unwrap())
    }

    #[tokio::test]
    async fn navigate_renders_exact_child_set() {
        let f = fixture(
            MemoryRemote::new()
                .with_file("/docs/a.txt", "A")
                .with_file("/docs/b.txt", "B")
                .with_dir("/docs/sub"),
        );

        assert!(f.fm.on_navigate("/docs").await);
        assert_eq!(names(&f.fm), vec!["..", "sub", "a.txt", "b.txt"]);
        assert_eq!(f.fm.current_path().as_deref(), Some("/docs/"));
    }

    #[tokio::test]
    async fn drop_uploads_and_shows_file() {
        let f = fixture(MemoryRemote::new().with_dir("/docs"));
        f.fm.on_navigate("/docs").await;
        f.remote.clear_requests();

        let local = TempDir::new().unwrap();
        let entry = file_entry(&local, "report.pdf", &vec![5u8; 70_000]).await;
        let summary = f.fm.on_drop(vec![entry], "/docs/", None).await.unwrap();

        assert_eq!(summary.uploaded, 1);
        assert_eq!(
            f.remote.requests(),
            vec![
                RemoteRequest::Put { path: "/docs/report.pdf".into(), offset: 0, len: 32_768 },
                RemoteRequest::Put { path: "/docs/report.pdf".into(), offset: 32_768, len: 32_768 },
                RemoteRequest::Put { path: "/docs/report.pdf".into(), offset: 65_536, len: 4_464 },
                RemoteRequest::Info(vec!["/docs/report.pdf".into()]),
            ]
        );
        let node = f.fm.node("/docs/report.pdf").unwrap();
        assert_eq!(node.attribute("length"), Some("70000"));
    }

    #[tokio::test]
    async fn drop_of_nested_directory_refreshes_each_level() {
        let f = fixture(MemoryRemote::new().with_dir("/docs"));
        f.fm.on_navigate("/docs").await;

        let local = TempDir::new().unwrap();
        let album = local.path().join("album");
        fs::create_dir_all(album.join("raw")).unwrap();
        fs::write(album.join("cover.jpg"), b"C").unwrap();
        fs::write(album.join("raw").join("shot.cr2"), b"R").unwrap();
        let entry: Box<dyn EntryHandle> = Box::new(FsEntry::open(&album).await.unwrap());

        f.remote.clear_requests();
        let summary = f.fm.on_drop(vec![entry], "/docs/", None).await.unwrap();

        assert_eq!(summary.uploaded, 2);
        assert_eq!(summary.directories, 2);
        // Only the top-level folder is a child of the displayed directory.
        let infos: Vec<_> = f
            .remote
            .requests()
            .into_iter()
            .filter(|r| matches!(r, RemoteRequest::Info(_)))
            .collect();
        assert_eq!(infos, vec![RemoteRequest::Info(vec!["/docs/album".into()])]);
        assert!(f.fm.node("/docs/album").unwrap().is_dir());
    }

    #[tokio::test]
    async fn drop_into_readonly_directory_is_refused() {
        let f = fixture(MemoryRemote::new().with_dir("/ro").with_readonly("/ro"));
        f.fm.on_navigate("/ro").await;
        assert!(f.fm.readonly());
        f.remote.clear_requests();

        let local = TempDir::new().unwrap();
        let entry = file_entry(&local, "x.txt", b"x").await;
        let err = f.fm.on_drop(vec![entry], "/ro", None).await.unwrap_err();

        assert!(matches!(err, PanelError::ReadOnly(_)));
        assert!(f.remote.requests().is_empty());
        assert_eq!(f.status.errors(), vec!["Cannot upload: /ro/ is read-only"]);
    }

    #[tokio::test]
    async fn drop_before_navigation_is_refused() {
        let f = fixture(MemoryRemote::new());
        let local = TempDir::new().unwrap();
        let entry = file_entry(&local, "x.txt", b"x").await;

        let err = f.fm.on_drop(vec![entry], "/", None).await.unwrap_err();
        assert!(matches!(err, PanelError::NoDirectory));
        assert!(f.remote.requests().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_node() {
        let f = fixture(
            MemoryRemote::new()
                .with_file("/docs/a.txt", "A")
                .with_file("/docs/b.txt", "B"),
        );
        f.fm.on_navigate("/docs").await;
        f.surface.take();
        f.remote.clear_requests();

        f.fm.on_delete_request("/docs/a.txt").await;

        assert_eq!(
            f.remote.requests(),
            vec![
                RemoteRequest::Delete("/docs/a.txt".into()),
                RemoteRequest::Info(vec!["/docs/a.txt".into()]),
            ]
        );
        assert_eq!(f.surface.take(), vec!["remove /docs/a.txt"]);
        assert_eq!(names(&f.fm), vec!["..", "b.txt"]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_node_and_reports() {
        let f = fixture(
            MemoryRemote::new()
                .with_file("/ro/a.txt", "A")
                .with_readonly("/ro"),
        );
        f.fm.on_navigate("/ro").await;
        f.surface.take();

        f.fm.on_delete_request("/ro/a.txt").await;

        assert!(f.fm.node("/ro/a.txt").is_some());
        assert!(f.surface.take().is_empty());
        let errors = f.status.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Delete failed with"));
    }

    #[tokio::test]
    async fn activate_file_hands_download_to_surface() {
        let f = fixture(MemoryRemote::new().with_file("/docs/a b.txt", "AB"));
        f.fm.on_navigate("/docs").await;

        f.fm.on_activate("/docs/a b.txt").await.unwrap();
        let downloads = f.surface.downloads.lock().unwrap().clone();
        assert_eq!(
            downloads,
            vec![DownloadRequest {
                url: "memory:///get?path=%2Fdocs%2Fa%20b.txt".into(),
                file_name: "a b.txt".into(),
            }]
        );
        assert_eq!(f.fm.download("/docs/a b.txt").await.unwrap(), b"AB");
    }

    #[tokio::test]
    async fn activate_directory_navigates() {
        let f = fixture(MemoryRemote::new().with_file("/docs/sub/x.txt", "X"));
        f.fm.on_navigate("/docs").await;

        f.fm.on_activate("/docs/sub").await.unwrap();
        assert_eq!(f.fm.current_path().as_deref(), Some("/docs/sub/"));

        f.fm.on_activate("/docs/").await.unwrap();
        assert_eq!(f.fm.current_path().as_deref(), Some("/docs/"));

        let err = f.fm.on_activate("/nowhere").await.unwrap_err();
        assert!(matches!(err, PanelError::UnknownNode(_)));
    }

    #[tokio::test]
    async fn parent_link_is_not_draggable() {
        let f = fixture(MemoryRemote::new().with_file("/docs/a.txt", "A"));
        f.fm.on_navigate("/docs").await;

        assert!(f.fm.on_drag_start("/docs/a.txt"));
        assert!(!f.fm.on_drag_start("/"));
        assert!(!f.fm.on_drag_start("/docs/missing"));
    }

    /// Holds back `info` answers for one path until released.
    struct GatedRemote {
        inner: MemoryRemote,
        gated: String,
        gate: Notify,
    }

    impl RemoteApi for GatedRemote {
        fn info<'a>(&'a self, query: &'a InfoQuery) -> RemoteFuture<'a, InfoResponse> {
            Box::pin(async move {
                if query.paths().iter().any(|p| *p == self.gated) {
                    self.gate.notified().await;
                }
                self.inner.info(query).await
            })
        }

        fn put<'a>(
            &'a self,
            path: &'a str,
            offset: u64,
            data: &'a [u8],
        ) -> RemoteFuture<'a, StatusResponse> {
            self.inner.put(path, offset, data)
        }

        fn get<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, Vec<u8>> {
            self.inner.get(path)
        }

        fn delete<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, StatusResponse> {
            self.inner.delete(path)
        }

        fn download_url(&self, path: &str) -> String {
            self.inner.download_url(path)
        }
    }

    #[tokio::test]
    async fn stale_refresh_after_navigation_is_discarded() {
        let remote = Arc::new(GatedRemote {
            inner: MemoryRemote::new()
                .with_file("/docs/late.txt", "L")
                .with_file("/top.txt", "T"),
            gated: "/docs/late.txt".into(),
            gate: Notify::new(),
        });
        let surface = Arc::new(RecordingSurface::default());
        let fm = FileManager::builder(remote.clone(), surface.clone()).build();

        // Enter /docs without its children being reconciled yet.
        let navigation = fm.navigate("/docs");
        let leave = async {
            tokio::task::yield_now().await;
            fm.navigate("/").await.unwrap();
            remote.gate.notify_one();
        };
        let (entered, _) = tokio::join!(navigation, leave);
        entered.unwrap();

        assert_eq!(fm.current_path().as_deref(), Some("/"));
        assert!(fm.node("/docs/late.txt").is_none());
        let mut got = names(&fm);
        got.sort();
        assert_eq!(got, vec!["docs", "top.txt"]);
    }

    #[tokio::test]
    async fn errors_from_remote_are_typed() {
        let f = fixture(MemoryRemote::new());
        let err = f.fm.download("/missing").await.unwrap_err();
        assert!(matches!(err, PanelError::Remote(RemoteError::Api { status: 404, .. })));
    }
}
