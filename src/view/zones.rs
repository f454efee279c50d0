//! Per-zone key reducers.
//!
//! Each zone owns a cursor over its own rows and turns keys into a new cursor
//! plus, optionally, an action for the session to carry out. None of them know
//! about the other zones or about zone switching.

use crate::filesystem::SortKey;
use crate::view::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneAction {
    ToggleViewMode,
    ToggleFileView,
    FilterPush(char),
    FilterPop,
    SelectLayer(usize),
    OpenCommand(usize),
    ActivateTreeRow(usize),
    ExpandAll,
    CollapseAll,
    PreviousPage,
    NextPage,
    FirstPage,
    LastPage,
    SortBy(SortKey),
}

/// Up/Down/Home/End movement over `len` rows.
fn move_cursor(cursor: usize, key: Key, len: usize) -> Option<usize> {
    let last = len.saturating_sub(1);
    match key {
        Key::Up => Some(cursor.saturating_sub(1)),
        Key::Down => Some((cursor + 1).min(last)),
        Key::Home => Some(0),
        Key::End => Some(last),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolbarControl {
    #[default]
    ViewMode,
    FileView,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolbarState {
    pub cursor: ToolbarControl,
}

impl ToolbarState {
    pub fn reduce(self, key: Key) -> (Self, Option<ZoneAction>) {
        use ToolbarControl::*;

        match (self.cursor, key) {
            (ViewMode, Key::Right) => (Self { cursor: FileView }, None),
            (FileView, Key::Right) => (Self { cursor: Filter }, None),
            (FileView, Key::Left) => (Self { cursor: ViewMode }, None),
            (Filter, Key::Left) => (Self { cursor: FileView }, None),
            (ViewMode, Key::Enter | Key::Char(' ')) => (self, Some(ZoneAction::ToggleViewMode)),
            (FileView, Key::Enter | Key::Char(' ')) => (self, Some(ZoneAction::ToggleFileView)),
            (Filter, Key::Char(c)) => (self, Some(ZoneAction::FilterPush(c))),
            (Filter, Key::Backspace) => (self, Some(ZoneAction::FilterPop)),
            _ => (self, None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerListState {
    pub cursor: usize,
}

impl LayerListState {
    pub fn reduce(self, key: Key, layer_count: usize) -> (Self, Option<ZoneAction>) {
        if let Some(cursor) = move_cursor(self.cursor, key, layer_count) {
            return (Self { cursor }, None);
        }
        let action = match key {
            Key::Enter if layer_count > 0 => Some(ZoneAction::SelectLayer(self.cursor)),
            Key::Char('c') if layer_count > 0 => Some(ZoneAction::OpenCommand(self.cursor)),
            _ => None,
        };
        (self, action)
    }

    pub fn clamped(self, layer_count: usize) -> Self {
        Self {
            cursor: self.cursor.min(layer_count.saturating_sub(1)),
        }
    }
}

/// Cursor over the tree pane rows: the root row followed by the visible
/// directory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreePaneState {
    pub cursor: usize,
}

impl TreePaneState {
    pub fn reduce(self, key: Key, row_count: usize) -> (Self, Option<ZoneAction>) {
        if let Some(cursor) = move_cursor(self.cursor, key, row_count) {
            return (Self { cursor }, None);
        }
        let action = match key {
            Key::Enter if row_count > 0 => Some(ZoneAction::ActivateTreeRow(self.cursor)),
            Key::Char('+') => Some(ZoneAction::ExpandAll),
            Key::Char('-') => Some(ZoneAction::CollapseAll),
            _ => None,
        };
        (self, action)
    }

    pub fn clamped(self, row_count: usize) -> Self {
        Self {
            cursor: self.cursor.min(row_count.saturating_sub(1)),
        }
    }
}

/// Row cursor within the current page of the file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilePaneState {
    pub cursor: usize,
}

impl FilePaneState {
    pub fn reduce(self, key: Key, rows_on_page: usize) -> (Self, Option<ZoneAction>) {
        let action = match key {
            Key::Up | Key::Down => {
                let cursor = move_cursor(self.cursor, key, rows_on_page).unwrap_or(self.cursor);
                return (Self { cursor }, None);
            }
            Key::Left | Key::PageUp => ZoneAction::PreviousPage,
            Key::Right | Key::PageDown => ZoneAction::NextPage,
            Key::Home => ZoneAction::FirstPage,
            Key::End => ZoneAction::LastPage,
            Key::Char('n') => ZoneAction::SortBy(SortKey::Name),
            Key::Char('s') => ZoneAction::SortBy(SortKey::Size),
            _ => return (self, None),
        };
        (Self { cursor: 0 }, Some(action))
    }

    pub fn clamped(self, rows_on_page: usize) -> Self {
        Self {
            cursor: self.cursor.min(rows_on_page.saturating_sub(1)),
        }
    }
}
