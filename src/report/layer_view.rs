use clap::ValueEnum;
use derive_more::Display;

use crate::filesystem::{FileEntry, FileSort, SortKey};
use crate::report::ImageReport;

/// Which layers contribute files to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, ValueEnum)]
pub enum ViewMode {
    /// Only the selected layer's own files.
    #[default]
    #[display("This Layer")]
    Layer,
    /// Every layer from the first up to the selected one.
    #[display("Accumulated")]
    Accumulated,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Layer => ViewMode::Accumulated,
            ViewMode::Accumulated => ViewMode::Layer,
        }
    }

    /// Whether layer `index` is part of the view built for `selected`.
    pub fn includes(self, index: usize, selected: usize) -> bool {
        match self {
            ViewMode::Layer => index == selected,
            ViewMode::Accumulated => index <= selected,
        }
    }
}

/// How the files of the view are browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, ValueEnum)]
pub enum FileViewMode {
    /// Directory tree next to the files of the selected directory.
    #[default]
    #[display("Tree")]
    Tree,
    /// One flat list of every file.
    #[display("Files")]
    Files,
}

impl FileViewMode {
    pub fn toggled(self) -> Self {
        match self {
            FileViewMode::Tree => FileViewMode::Files,
            FileViewMode::Files => FileViewMode::Tree,
        }
    }

    /// Sort a file list starts with whenever this view is entered.
    pub fn default_sort(self) -> FileSort {
        match self {
            FileViewMode::Tree => FileSort::new(SortKey::Name),
            FileViewMode::Files => FileSort::new(SortKey::Size),
        }
    }
}

/// Entries of the selected layer, or of every layer up to it. Later layers
/// come last so they win when the tree collapses duplicate paths.
pub fn collect_entries(report: &ImageReport, selected: usize, mode: ViewMode) -> Vec<FileEntry> {
    report
        .layers
        .iter()
        .enumerate()
        .filter(|(index, _)| mode.includes(*index, selected))
        .flat_map(|(_, layer)| layer.files.iter().cloned())
        .collect()
}

/// Case-insensitive substring filter on the path.
pub fn filter_entries(entries: Vec<FileEntry>, filter: &str) -> Vec<FileEntry> {
    if filter.is_empty() {
        return entries;
    }
    let needle = filter.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| entry.path.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::report::image::tests::sample;

    fn paths(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.path.as_str()).collect()
    }

    #[test]
    fn layer_mode_uses_only_selected_layer() {
        let entries = collect_entries(&sample(), 1, ViewMode::Layer);
        assert_eq!(paths(&entries), vec!["a/.wh.b.txt", "etc/motd"]);
    }

    #[test]
    fn accumulated_mode_concatenates_in_layer_order() {
        let entries = collect_entries(&sample(), 1, ViewMode::Accumulated);
        assert_eq!(
            paths(&entries),
            vec!["a/b.txt", "a/c.txt", "d.txt", "a/.wh.b.txt", "etc/motd"]
        );
    }

    #[test]
    fn out_of_range_layer_is_empty_in_layer_mode() {
        assert!(collect_entries(&sample(), 9, ViewMode::Layer).is_empty());
    }

    #[rstest]
    #[case("", 5)]
    #[case("A/", 3)]
    #[case("MOTD", 1)]
    #[case("nothing", 0)]
    fn filter_is_case_insensitive(#[case] filter: &str, #[case] expected: usize) {
        let entries = collect_entries(&sample(), 1, ViewMode::Accumulated);
        assert_eq!(filter_entries(entries, filter).len(), expected);
    }

    #[test]
    fn accumulated_range_marks_earlier_layers() {
        assert!(ViewMode::Accumulated.includes(0, 2));
        assert!(!ViewMode::Accumulated.includes(3, 2));
        assert!(!ViewMode::Layer.includes(0, 2));
    }
}
