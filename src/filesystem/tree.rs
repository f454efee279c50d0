use derive_more::{Display, From, Into};
use hashlink::LinkedHashMap;
use tracing::debug;

use crate::filesystem::{FileEntry, PATH_SEPARATOR, ordering};

/// Stable handle of a node inside one [`FileTree`].
///
/// Ids are positions in the tree's arena and are only meaningful for the tree
/// that produced them. A rebuilt tree hands out fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("#{_0}")]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    id: NodeId,
    parent: Option<NodeId>,
    name: String,
    size: u64,
    is_whiteout: bool,
    is_file: bool,
    children: LinkedHashMap<String, NodeId>,
}

impl TreeNode {
    fn new(id: NodeId, parent: Option<NodeId>, name: &str) -> Self {
        Self {
            id,
            parent,
            name: name.to_string(),
            size: 0,
            is_whiteout: false,
            is_file: false,
            children: LinkedHashMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_whiteout(&self) -> bool {
        self.is_whiteout
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn is_directory(&self) -> bool {
        !self.is_file
    }

    #[cfg(test)]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Hierarchical view of a flat list of file entries.
///
/// Building is done in two phases: every entry is first inserted into the
/// topology, then directory sizes are resolved bottom-up in one pass. The root
/// always sits at [`NodeId::ROOT`] with an empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    nodes: Vec<TreeNode>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self {
            nodes: vec![TreeNode::new(NodeId::ROOT, None, "")],
        }
    }
}

impl FileTree {
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a FileEntry>) -> Self {
        let mut tree = Self::default();
        let mut entry_count = 0usize;

        for entry in entries {
            tree.insert_entry(entry);
            entry_count += 1;
        }
        tree.aggregate_sizes();

        debug!(
            "Built file tree from {} entries: {} nodes, {} bytes",
            entry_count,
            tree.nodes.len(),
            tree.root().size
        );
        tree
    }

    fn insert_entry(&mut self, entry: &FileEntry) {
        let mut segments = entry.path.split(PATH_SEPARATOR).peekable();
        let mut current = NodeId::ROOT;

        while let Some(segment) = segments.next() {
            current = self.child_or_insert(current, segment);

            if segments.peek().is_none() {
                let node = &mut self.nodes[current.0];
                node.size = entry.size;
                node.is_whiteout = entry.is_whiteout;
                node.is_file = true;
            }
        }
    }

    fn child_or_insert(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(&existing) = self.nodes[parent.0].children.get(name) {
            return existing;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::new(id, Some(parent), name));
        self.nodes[parent.0].children.insert(name.to_string(), id);
        id
    }

    /// Resolves directory sizes. Children are always allocated after their
    /// parent, so walking the arena backwards visits every child before its
    /// parent.
    fn aggregate_sizes(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            if self.nodes[index].is_file {
                continue;
            }
            let total = self.nodes[index]
                .children
                .values()
                .map(|child| self.nodes[child.0].size)
                .fold(0u64, u64::saturating_add);
            self.nodes[index].size = total;
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[NodeId::ROOT.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn child(&self, parent: NodeId, name: &str) -> Option<&TreeNode> {
        self.get(parent)?
            .children
            .get(name)
            .and_then(|&id| self.get(id))
    }

    /// Children in insertion order.
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = &TreeNode> {
        self.get(parent)
            .into_iter()
            .flat_map(|node| node.children.values())
            .filter_map(|&id| self.get(id))
    }

    /// Children with directories first, then by name.
    pub fn sorted_children(&self, parent: NodeId) -> Vec<&TreeNode> {
        let mut children: Vec<_> = self.children(parent).collect();
        children.sort_by(|a, b| ordering::display_order(a, b));
        children
    }

    /// Directory children sorted by name.
    pub fn directory_children(&self, parent: NodeId) -> Vec<&TreeNode> {
        let mut dirs: Vec<_> = self
            .children(parent)
            .filter(|child| child.is_directory())
            .collect();
        dirs.sort_by(|a, b| ordering::display_order(a, b));
        dirs
    }

    /// File children in insertion order.
    pub fn file_children(&self, parent: NodeId) -> Vec<&TreeNode> {
        self.children(parent).filter(|child| child.is_file()).collect()
    }

    /// Every directory id except the root.
    pub fn directory_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .skip(1)
            .filter(|node| node.is_directory())
            .map(|node| node.id)
    }

    /// Slash-joined path of a node relative to the root.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self.get(id)?;
        while let Some(parent) = current.parent {
            segments.push(current.name.as_str());
            current = self.get(parent)?;
        }
        segments.reverse();
        Some(segments.join(&PATH_SEPARATOR.to_string()))
    }

    /// Flattens all file nodes back into entries, in pre-order.
    #[cfg(test)]
    pub fn files(&self) -> Vec<FileEntry> {
        let mut files = Vec::new();
        let mut stack: Vec<(NodeId, String)> = self
            .root()
            .children
            .iter()
            .rev()
            .map(|(name, &id)| (id, name.clone()))
            .collect();

        while let Some((id, path)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if node.is_file {
                files.push(FileEntry::new(path.clone(), node.size, node.is_whiteout));
            }
            for (name, &child) in node.children.iter().rev() {
                stack.push((child, format!("{path}{PATH_SEPARATOR}{name}")));
            }
        }
        files
    }
}
