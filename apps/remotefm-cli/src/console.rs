//! Terminal rendering of the panel.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};
use remotefm_transfer::{StatusEvent, StatusKind, StatusSink};
use remotefm_view::{DownloadRequest, ViewNode, ViewSurface};
use tracing::trace;

/// Surface and status sink writing to the terminal.
///
/// Tree mutations are only traced; listings are printed on demand from a
/// snapshot of the panel's children.
#[derive(Default)]
pub struct ConsoleSurface {
    downloads: Mutex<Vec<DownloadRequest>>,
}

impl ConsoleSurface {
    pub fn take_downloads(&self) -> Vec<DownloadRequest> {
        std::mem::take(&mut *self.downloads.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ViewSurface for ConsoleSurface {
    fn directory_changed(&self, path: &str, attributes: &BTreeMap<String, String>) {
        trace!(path, readonly = attributes.contains_key("readonly"), "directory");
    }

    fn cleared(&self) {
        trace!("cleared");
    }

    fn node_inserted(&self, index: usize, node: &ViewNode) {
        trace!(index, path = node.path(), "inserted");
    }

    fn node_rendered(&self, node: &ViewNode) {
        trace!(path = node.path(), "rendered");
    }

    fn node_removed(&self, path: &str) {
        trace!(path, "removed");
    }

    fn download(&self, request: &DownloadRequest) {
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
    }
}

impl StatusSink for ConsoleSurface {
    fn log(&self, event: StatusEvent) {
        let mut err = std::io::stderr().lock();
        let _ = match (event.kind, event.percent()) {
            (Some(StatusKind::Error), _) => writeln!(err, "error: {}", event.message),
            (Some(StatusKind::Breadcrumb), _) => writeln!(err, "in {}", event.message),
            (None, Some(pct)) => writeln!(err, "{} {pct:.0}%", event.message),
            (None, None) => writeln!(err, "{}", event.message),
        };
    }
}

/// One listing line: kind flag, size, modification time, name.
///
/// Files only report `ctime`, which the server fills with the modification
/// time, so it stands in when `mtime` is absent.
pub fn format_entry(node: &ViewNode) -> String {
    let flag = if node.is_dir() { 'd' } else { '-' };
    let size = node.attribute("length").unwrap_or("");
    let mtime = node
        .attribute("mtime")
        .or_else(|| node.attribute("ctime"))
        .and_then(|m| m.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let suffix = if node.is_dir() && !node.is_parent_link() { "/" } else { "" };
    format!("{flag} {size:>10} {mtime:>16}  {}{suffix}", node.name())
}
