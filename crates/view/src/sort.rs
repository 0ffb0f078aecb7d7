use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::node::ViewNode;

/// Ordering used when inserting new nodes.
///
/// A new node is placed before the first sibling that compares
/// [`Ordering::Greater`] against it.
pub type Comparator = Box<dyn Fn(&ViewNode, &ViewNode) -> Ordering + Send + Sync>;

/// Case-insensitive name order, ties broken by the raw name.
///
/// The `..` node always comes first.
pub fn by_name(a: &ViewNode, b: &ViewNode) -> Ordering {
    parent_link_first(a, b).then_with(|| {
        a.name()
            .to_lowercase()
            .cmp(&b.name().to_lowercase())
            .then_with(|| a.name().cmp(b.name()))
    })
}

/// `..` first, then directories before files, then [`by_name`].
pub fn directories_first(a: &ViewNode, b: &ViewNode) -> Ordering {
    parent_link_first(a, b)
        .then_with(|| b.is_dir().cmp(&a.is_dir()))
        .then_with(|| by_name(a, b))
}

fn parent_link_first(a: &ViewNode, b: &ViewNode) -> Ordering {
    b.is_parent_link().cmp(&a.is_parent_link())
}

/// Named sort orders, as selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "dirs-first")]
    DirectoriesFirst,
    #[serde(rename = "name")]
    Name,
    /// Arrival order.
    #[serde(rename = "none")]
    None,
}

impl SortOrder {
    pub fn comparator(self) -> Option<Comparator> {
        match self {
            SortOrder::DirectoriesFirst => Some(Box::new(directories_first)),
            SortOrder::Name => Some(Box::new(by_name)),
            SortOrder::None => None,
        }
    }
}
