use std::collections::{BTreeMap, HashMap};
use std::cmp::Ordering;

use remotefm_protocol::NodeProps;
use remotefm_protocol::paths::ensure_trailing_slash;
use tracing::trace;

use crate::node::ViewNode;
use crate::sort::Comparator;
use crate::surface::ViewSurface;

/// Outcome of [`DirectoryState::materialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// A new node was attached at this display index.
    Inserted(usize),
    /// An attached node was rebuilt in place.
    Updated,
    /// The attribute snapshot was identical; nothing was touched.
    Unchanged,
}

/// The displayed directory and its rendered children.
///
/// Holds at most one [`ViewNode`] per path. Every mutation is mirrored to
/// the [`ViewSurface`] passed in, and only mutations are mirrored.
pub struct DirectoryState {
    path: Option<String>,
    attributes: BTreeMap<String, String>,
    nodes: HashMap<String, ViewNode>,
    order: Vec<String>,
    generation: u64,
    comparator: Option<Comparator>,
}

impl DirectoryState {
    /// Creates an empty state; no directory is displayed yet.
    pub fn new(comparator: Option<Comparator>) -> Self {
        Self {
            path: None,
            attributes: BTreeMap::new(),
            nodes: HashMap::new(),
            order: Vec::new(),
            generation: 0,
            comparator,
        }
    }

    /// Slash-terminated path of the displayed directory.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Attribute snapshot of the displayed directory itself.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn readonly(&self) -> bool {
        self.attributes.get("readonly").map(String::as_str) == Some("true")
    }

    /// Counter bumped every time the displayed path changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, path: &str) -> Option<&ViewNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Children in display order.
    pub fn children(&self) -> impl Iterator<Item = &ViewNode> {
        self.order.iter().filter_map(|path| self.nodes.get(path))
    }

    /// Makes `props` the displayed directory.
    ///
    /// Children are dropped and the generation advances only when the
    /// slash-terminated path differs from the current one. Returns whether
    /// it did.
    pub fn enter(&mut self, props: &NodeProps, surface: &dyn ViewSurface) -> bool {
        let path = ensure_trailing_slash(&props.path);
        let changed = self.path.as_deref() != Some(path.as_str());
        if changed {
            self.nodes.clear();
            self.order.clear();
            self.generation += 1;
            surface.cleared();
        }

        let mut attributes = props.attributes();
        attributes.insert("path".to_string(), path.clone());
        surface.directory_changed(&path, &attributes);
        self.attributes = attributes;
        self.path = Some(path);
        changed
    }

    /// Creates or updates the node for `props`.
    ///
    /// An identical attribute snapshot is a no-op. Otherwise the node is
    /// rebuilt; a new node is inserted before the first sibling the
    /// comparator orders after it, or appended. Attached nodes keep their
    /// position.
    pub fn materialize(&mut self, props: &NodeProps, surface: &dyn ViewSurface) -> Materialized {
        if let Some(existing) = self.nodes.get_mut(&props.path) {
            if existing.attributes() == &props.attributes() {
                trace!(path = %props.path, "node unchanged");
                return Materialized::Unchanged;
            }
            *existing = ViewNode::from_props(props);
            surface.node_rendered(existing);
            return Materialized::Updated;
        }

        let node = ViewNode::from_props(props);
        let index = self.insertion_index(&node);
        surface.node_inserted(index, &node);
        self.order.insert(index, node.path().to_string());
        self.nodes.insert(node.path().to_string(), node);
        Materialized::Inserted(index)
    }

    /// Detaches the node for `path`, if attached.
    pub fn remove(&mut self, path: &str, surface: &dyn ViewSurface) -> Option<ViewNode> {
        let node = self.nodes.remove(path)?;
        self.order.retain(|p| p != path);
        surface.node_removed(path);
        Some(node)
    }

    fn insertion_index(&self, node: &ViewNode) -> usize {
        let Some(cmp) = &self.comparator else {
            return self.order.len();
        };
        self.children()
            .position(|sibling| cmp(node, sibling) == Ordering::Less)
            .unwrap_or(self.order.len())
    }
}

impl std::fmt::Debug for DirectoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryState")
            .field("path", &self.path)
            .field("generation", &self.generation)
            .field("children", &self.order)
            .field("sorted", &self.comparator.is_some())
            .finish()
    }
}
