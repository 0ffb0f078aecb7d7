use std::collections::BTreeMap;

use crate::node::ViewNode;

/// A download handed to the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Remote `get` URL of the file.
    pub url: String,
    /// Suggested local file name.
    pub file_name: String,
}

/// Rendering layer driven by [`DirectoryState`](crate::DirectoryState).
///
/// Calls arrive while the directory state is locked; implementations must
/// not call back into the file manager from inside them.
pub trait ViewSurface: Send + Sync {
    /// The displayed directory or its attributes changed.
    fn directory_changed(&self, path: &str, attributes: &BTreeMap<String, String>);

    /// All children were removed.
    fn cleared(&self);

    /// A new node was attached at `index` in display order.
    fn node_inserted(&self, index: usize, node: &ViewNode);

    /// An attached node got new attributes and must be redrawn.
    fn node_rendered(&self, node: &ViewNode);

    /// The node for `path` was detached.
    fn node_removed(&self, path: &str);

    /// Start a browser-level download.
    fn download(&self, request: &DownloadRequest);
}
