use std::cmp::Ordering;

use derive_more::Display;

use crate::filesystem::TreeNode;

/// Tree order: directories before files, then raw name.
pub fn display_order(a: &TreeNode, b: &TreeNode) -> Ordering {
    a.is_file()
        .cmp(&b.is_file())
        .then_with(|| a.name().cmp(b.name()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortKey {
    #[display("name")]
    Name,
    #[display("size")]
    Size,
}

impl SortKey {
    pub fn default_direction(self) -> SortDirection {
        match self {
            SortKey::Name => SortDirection::Ascending,
            SortKey::Size => SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortDirection {
    #[display("asc")]
    Ascending,
    #[display("desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Column sort of a file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{key} {direction}")]
pub struct FileSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl FileSort {
    pub fn new(key: SortKey) -> Self {
        Self {
            key,
            direction: key.default_direction(),
        }
    }

    /// Same key flips the direction, a new key starts at its default.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self::new(key)
        }
    }

    pub fn compare(&self, a: (&str, u64), b: (&str, u64)) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => a.0.cmp(b.0),
            SortKey::Size => a.1.cmp(&b.1),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}
