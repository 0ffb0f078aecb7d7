use std::collections::BTreeMap;

use remotefm_protocol::paths::last_segment;
use remotefm_protocol::{NodeKind, NodeProps};

/// Display name of the synthetic parent-navigation node.
pub const PARENT_NODE_NAME: &str = "..";

/// What activating (clicking) a node does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    /// Change the displayed directory.
    Navigate(String),
    /// Download the file through the remote `get` endpoint.
    Download { path: String, file_name: String },
}

/// The rendered representation of one [`NodeProps`] snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    path: String,
    kind: NodeKind,
    name: String,
    attributes: BTreeMap<String, String>,
    action: NodeAction,
    draggable: bool,
}

impl ViewNode {
    /// Builds a node from server metadata.
    ///
    /// The display name falls back to the last path segment when the
    /// props carry no explicit name.
    pub fn from_props(props: &NodeProps) -> Self {
        let name = match &props.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => last_segment(&props.path).to_string(),
        };
        let action = match props.kind {
            NodeKind::Dir => NodeAction::Navigate(props.path.clone()),
            NodeKind::File => NodeAction::Download {
                path: props.path.clone(),
                file_name: name.clone(),
            },
        };
        let draggable = props.name.as_deref() != Some(PARENT_NODE_NAME);
        Self {
            path: props.path.clone(),
            kind: props.kind,
            name,
            attributes: props.attributes(),
            action,
            draggable,
        }
    }

    /// Props for the synthetic `..` node pointing at `parent`.
    pub fn parent_props(parent: &str) -> NodeProps {
        NodeProps::new(parent, NodeKind::Dir).with_name(PARENT_NODE_NAME)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute snapshot of the props that produced this node.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn action(&self) -> &NodeAction {
        &self.action
    }

    /// Whether the node can be dragged onto the trash.
    pub fn draggable(&self) -> bool {
        self.draggable
    }

    /// Whether this is the synthetic `..` node.
    pub fn is_parent_link(&self) -> bool {
        !self.draggable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_node_downloads() {
        let props = NodeProps::new("/docs/report.pdf", NodeKind::File).with_attr("length", 70000);
        let node = ViewNode::from_props(&props);
        assert_eq!(node.name(), "report.pdf");
        assert!(node.draggable());
        assert_eq!(node.attribute("length"), Some("70000"));
        assert_eq!(
            node.action(),
            &NodeAction::Download {
                path: "/docs/report.pdf".into(),
                file_name: "report.pdf".into()
            }
        );
    }

    #[test]
    fn dir_node_navigates() {
        let node = ViewNode::from_props(&NodeProps::new("/docs/sub", NodeKind::Dir));
        assert!(node.is_dir());
        assert_eq!(node.action(), &NodeAction::Navigate("/docs/sub".into()));
    }

    #[test]
    fn explicit_name_wins() {
        let props = NodeProps::new("/docs/x", NodeKind::File).with_name("Fancy");
        assert_eq!(ViewNode::from_props(&props).name(), "Fancy");
    }

    #[test]
    fn parent_node_is_not_draggable() {
        let node = ViewNode::from_props(&ViewNode::parent_props("/"));
        assert_eq!(node.name(), "..");
        assert!(!node.draggable());
        assert!(node.is_parent_link());
        assert_eq!(node.action(), &NodeAction::Navigate("/".into()));
    }
}
