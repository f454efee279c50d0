use std::borrow::Cow;

use crate::filesystem::{FileEntry, FileSort, TreeNode, display_label};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListItem {
    pub name: String,
    pub size: u64,
    pub is_whiteout: bool,
}

impl FileListItem {
    pub fn label(&self) -> Cow<'_, str> {
        display_label(&self.name, self.is_whiteout)
    }
}

impl From<&TreeNode> for FileListItem {
    fn from(node: &TreeNode) -> Self {
        Self {
            name: node.name().to_string(),
            size: node.size(),
            is_whiteout: node.is_whiteout(),
        }
    }
}

impl From<&FileEntry> for FileListItem {
    fn from(entry: &FileEntry) -> Self {
        Self {
            name: entry.path.clone(),
            size: entry.size,
            is_whiteout: entry.is_whiteout,
        }
    }
}

/// A sorted file list together with the identity it is paginated under.
///
/// Every distinct ordering gets its own generation, so a re-sort counts as a
/// new list for the pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileList {
    source: Vec<FileListItem>,
    sorted: Vec<FileListItem>,
    sort: FileSort,
    generation: u64,
    max_size: u64,
}

impl FileList {
    pub fn new(source: Vec<FileListItem>, sort: FileSort, generation: u64) -> Self {
        let max_size = source.iter().map(|item| item.size).max().unwrap_or(0).max(1);
        let mut list = Self {
            source,
            sorted: Vec::new(),
            sort,
            generation,
            max_size,
        };
        list.apply_sort();
        list
    }

    fn apply_sort(&mut self) {
        let mut sorted = self.source.clone();
        let sort = self.sort;
        sorted.sort_by(|a, b| sort.compare((&a.name, a.size), (&b.name, b.size)));
        self.sorted = sorted;
    }

    /// Re-sorts the original items under a new generation.
    pub fn resort(&mut self, sort: FileSort, generation: u64) {
        self.sort = sort;
        self.generation = generation;
        self.apply_sort();
    }

    pub fn items(&self) -> &[FileListItem] {
        &self.sorted
    }

    pub fn sort(&self) -> FileSort {
        self.sort
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Share of the widest bar this item's size takes, in `0.0..=1.0`.
    pub fn bar_fraction(&self, item: &FileListItem) -> f64 {
        item.size as f64 / self.max_size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::SortKey;
    use crate::filesystem::ordering::SortDirection;

    fn item(name: &str, size: u64) -> FileListItem {
        FileListItem {
            name: name.to_string(),
            size,
            is_whiteout: false,
        }
    }

    fn names(list: &FileList) -> Vec<&str> {
        list.items().iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn sorts_by_size_descending_with_stable_ties() {
        let list = FileList::new(
            vec![item("a", 1), item("b", 5), item("c", 1), item("d", 9)],
            FileSort::new(SortKey::Size),
            0,
        );
        assert_eq!(names(&list), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn resort_uses_source_order_and_new_generation() {
        let mut list = FileList::new(
            vec![item("b", 1), item("a", 1), item("c", 2)],
            FileSort::new(SortKey::Size),
            3,
        );
        list.resort(list.sort().toggled(SortKey::Size), 4);
        assert_eq!(list.sort().direction, SortDirection::Ascending);
        assert_eq!(names(&list), vec!["b", "a", "c"]);
        assert_eq!(list.generation(), 4);
    }

    #[test]
    fn whiteouts_sort_by_stored_name() {
        let mut deleted = item(".wh.secret.txt", 0);
        deleted.is_whiteout = true;
        let list = FileList::new(
            vec![item("alpha", 0), deleted],
            FileSort::new(SortKey::Name),
            0,
        );
        assert_eq!(names(&list), vec![".wh.secret.txt", "alpha"]);
        assert_eq!(list.items()[0].label(), "secret.txt (deleted)");
    }

    #[test]
    fn bar_fraction_is_relative_to_largest_item() {
        let list = FileList::new(vec![item("a", 50), item("b", 100)], FileSort::new(SortKey::Name), 0);
        assert_eq!(list.bar_fraction(&list.items()[0]), 0.5);

        let zeros = FileList::new(vec![item("z", 0)], FileSort::new(SortKey::Name), 0);
        assert_eq!(zeros.bar_fraction(&zeros.items()[0]), 0.0);
    }
}
