//! Directory navigation.

use std::sync::Mutex;

use remotefm_protocol::InfoQuery;
use remotefm_protocol::paths::{is_root, parent_dir};
use remotefm_remote::RemoteApi;
use remotefm_transfer::{StatusEvent, StatusSink};
use remotefm_view::{DirectoryState, ViewNode, ViewSurface};
use tracing::debug;

use crate::error::PanelError;
use crate::lock_state;
use crate::reconcile::Reconciler;

/// Changes the displayed directory.
pub struct Navigator<'a> {
    remote: &'a dyn RemoteApi,
    state: &'a Mutex<DirectoryState>,
    surface: &'a dyn ViewSurface,
    status: &'a dyn StatusSink,
}

impl<'a> Navigator<'a> {
    pub fn new(
        remote: &'a dyn RemoteApi,
        state: &'a Mutex<DirectoryState>,
        surface: &'a dyn ViewSurface,
        status: &'a dyn StatusSink,
    ) -> Self {
        Self {
            remote,
            state,
            surface,
            status,
        }
    }

    /// Displays the directory at `path`.
    ///
    /// The view is only touched once the server confirms `path` is a
    /// directory. Children are cleared only when the displayed path
    /// actually changes; a `..` node is kept unless at the root, then the
    /// reported children are refreshed. Returns whether the displayed path
    /// changed.
    pub async fn navigate(&self, path: &str) -> Result<bool, PanelError> {
        let resp = self.remote.info(&InfoQuery::single(path)).await?;
        let props = match resp.paths.first() {
            Some(props) if resp.ok && props.is_dir() => props,
            _ => return Err(PanelError::NotADirectory(path.to_string())),
        };

        let (changed, dir) = {
            let mut state = lock_state(self.state);
            let changed = state.enter(props, self.surface);
            let dir = state.path().unwrap_or("/").to_string();
            if !is_root(&dir) {
                state.materialize(&ViewNode::parent_props(&parent_dir(&dir)), self.surface);
            }
            (changed, dir)
        };
        debug!(dir = %dir, changed, "entered directory");
        self.status.log(StatusEvent::breadcrumb(dir));

        let kids = props.kids.as_deref().unwrap_or_default();
        if !kids.is_empty() {
            Reconciler::new(self.remote, self.state, self.surface)
                .refresh(kids)
                .await;
        }
        Ok(changed)
    }
}
