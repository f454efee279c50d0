//! Layer file manifests as a navigable tree.
//!
//! A flat list of [`FileEntry`] values is folded into a [`FileTree`] whose
//! directory nodes carry the aggregate size of everything below them.

mod entry;
pub mod ordering;
mod tree;

pub use entry::{FileEntry, PATH_SEPARATOR, display_label};
pub use ordering::{FileSort, SortKey};
pub use tree::{FileTree, NodeId, TreeNode};
