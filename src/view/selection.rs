use std::collections::HashSet;

use tracing::debug;

use crate::filesystem::{FileTree, NodeId, TreeNode};

/// Active directory and expanded directories of the split tree view.
///
/// All state is keyed by [`NodeId`] and refers to one specific tree; callers
/// must [`reset`](Self::reset) it whenever the tree is rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: Option<NodeId>,
    expanded: HashSet<NodeId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    #[cfg(test)]
    pub fn expanded(&self) -> &HashSet<NodeId> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Selects `id` and toggles whether it is expanded.
    pub fn select(&mut self, id: NodeId) {
        self.selected = Some(id);
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn select_root(&mut self) {
        self.selected = None;
    }

    pub fn expand_all(&mut self, tree: &FileTree) {
        self.expanded = tree.directory_ids().collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn reset(&mut self) {
        if self.selected.is_some() || !self.expanded.is_empty() {
            debug!(
                "Dropping selection {:?} and {} expanded directories",
                self.selected,
                self.expanded.len()
            );
        }
        self.selected = None;
        self.expanded.clear();
    }

    /// Directory whose files are listed: the selection, or the root when
    /// nothing (or nothing valid) is selected.
    pub fn active_directory<'t>(&self, tree: &'t FileTree) -> &'t TreeNode {
        self.selected
            .and_then(|id| tree.get(id))
            .filter(|node| node.is_directory())
            .unwrap_or_else(|| tree.root())
    }

    pub fn visible_file_children<'t>(&self, tree: &'t FileTree) -> Vec<&'t TreeNode> {
        tree.file_children(self.active_directory(tree).id())
    }

    /// Directories in display order, descending only into expanded ones. The
    /// root's own directories are always listed.
    pub fn visible_directory_order(&self, tree: &FileTree) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = tree
            .directory_children(NodeId::ROOT)
            .iter()
            .rev()
            .map(|node| node.id())
            .collect();

        while let Some(id) = stack.pop() {
            order.push(id);
            if self.expanded.contains(&id) {
                stack.extend(
                    tree.directory_children(id)
                        .iter()
                        .rev()
                        .map(|node| node.id()),
                );
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::FileEntry;

    fn sample_tree() -> FileTree {
        let entries = [
            FileEntry::new("usr/lib/libc.so", 100, false),
            FileEntry::new("usr/bin/sh", 50, false),
            FileEntry::new("usr/README", 1, false),
            FileEntry::new("etc/passwd", 2, false),
            FileEntry::new("top.txt", 3, false),
        ];
        FileTree::build(&entries)
    }

    fn id_of(tree: &FileTree, path: &[&str]) -> NodeId {
        path.iter().fold(NodeId::ROOT, |parent, name| {
            tree.child(parent, name).unwrap().id()
        })
    }

    fn names(tree: &FileTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.get(id).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn select_toggles_expansion() {
        let tree = sample_tree();
        let usr = id_of(&tree, &["usr"]);
        let mut selection = SelectionModel::new();

        selection.select(usr);
        assert_eq!(selection.selected(), Some(usr));
        assert!(selection.is_expanded(usr));

        selection.select(usr);
        assert_eq!(selection.selected(), Some(usr));
        assert!(!selection.is_expanded(usr));
    }

    #[test]
    fn collapsed_tree_lists_top_level_directories() {
        let tree = sample_tree();
        let selection = SelectionModel::new();
        let order = selection.visible_directory_order(&tree);
        assert_eq!(names(&tree, &order), vec!["etc", "usr"]);
    }

    #[test]
    fn expanded_directories_are_flattened_pre_order() {
        let tree = sample_tree();
        let mut selection = SelectionModel::new();
        selection.select(id_of(&tree, &["usr"]));

        let order = selection.visible_directory_order(&tree);
        assert_eq!(names(&tree, &order), vec!["etc", "usr", "bin", "lib"]);
    }

    #[test]
    fn expand_all_and_collapse_all_keep_selection() {
        let tree = sample_tree();
        let etc = id_of(&tree, &["etc"]);
        let mut selection = SelectionModel::new();
        selection.select(etc);

        selection.expand_all(&tree);
        assert_eq!(selection.expanded().len(), 4);
        assert_eq!(selection.selected(), Some(etc));

        selection.collapse_all();
        assert!(selection.expanded().is_empty());
        assert_eq!(selection.selected(), Some(etc));
    }

    #[test]
    fn file_children_come_from_active_directory() {
        let tree = sample_tree();
        let mut selection = SelectionModel::new();

        let root_files: Vec<_> = selection
            .visible_file_children(&tree)
            .iter()
            .map(|node| node.name().to_string())
            .collect();
        assert_eq!(root_files, vec!["top.txt"]);

        selection.select(id_of(&tree, &["usr"]));
        let usr_files: Vec<_> = selection
            .visible_file_children(&tree)
            .iter()
            .map(|node| node.name().to_string())
            .collect();
        assert_eq!(usr_files, vec!["README"]);
    }

    #[test]
    fn stale_selection_falls_back_to_root() {
        let tree = sample_tree();
        let mut selection = SelectionModel::new();
        selection.select(NodeId::from(999));
        assert_eq!(selection.active_directory(&tree).id(), NodeId::ROOT);
    }

    #[test]
    fn reset_clears_after_source_switch() {
        let tree = sample_tree();
        let usr = id_of(&tree, &["usr"]);
        let mut selection = SelectionModel::new();
        selection.select(usr);
        assert_eq!(selection.expanded().len(), 1);

        selection.reset();
        assert_eq!(selection.selected(), None);
        assert!(selection.expanded().is_empty());
    }
}
