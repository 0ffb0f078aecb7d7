//! Rendered directory state for the remote file manager.
//!
//! [`DirectoryState`] owns the nodes of the currently displayed directory,
//! keyed by remote path, in display order. Every mutation is mirrored to a
//! [`ViewSurface`], the abstract rendering layer supplied by the front-end.
//! Nodes whose metadata did not change are left untouched.

pub mod directory;
pub mod node;
pub mod sort;
pub mod surface;

pub use directory::{DirectoryState, Materialized};
pub use node::{NodeAction, PARENT_NODE_NAME, ViewNode};
pub use sort::{Comparator, SortOrder, by_name, directories_first};
pub use surface::{DownloadRequest, ViewSurface};
