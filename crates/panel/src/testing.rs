use std::collections::BTreeMap;
use std::sync::Mutex;

use remotefm_transfer::{StatusEvent, StatusSink};
use remotefm_view::{DownloadRequest, ViewNode, ViewSurface};

/// Surface that records every call as a short line of text.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    calls: Mutex<Vec<String>>,
    pub downloads: Mutex<Vec<DownloadRequest>>,
}

impl RecordingSurface {
    /// Returns and forgets the calls recorded so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn push(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ViewSurface for RecordingSurface {
    fn directory_changed(&self, path: &str, _attributes: &BTreeMap<String, String>) {
        self.push(format!("dir {path}"));
    }

    fn cleared(&self) {
        self.push("clear".to_string());
    }

    fn node_inserted(&self, index: usize, node: &ViewNode) {
        self.push(format!("insert {index} {}", node.path()));
    }

    fn node_rendered(&self, node: &ViewNode) {
        self.push(format!("render {}", node.path()));
    }

    fn node_removed(&self, path: &str) {
        self.push(format!("remove {path}"));
    }

    fn download(&self, request: &DownloadRequest) {
        self.downloads.lock().unwrap().push(request.clone());
    }
}

/// Status sink keeping every event.
#[derive(Default)]
pub(crate) struct RecordingStatus {
    pub events: Mutex<Vec<StatusEvent>>,
}

impl RecordingStatus {
    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_error())
            .map(|e| e.message.clone())
            .collect()
    }
}

impl StatusSink for RecordingStatus {
    fn log(&self, event: StatusEvent) {
        self.events.lock().unwrap().push(event);
    }
}
