//! One interactive browsing session over a loaded report.
//!
//! The session owns every piece of view state and processes one [`Event`] at
//! a time to completion: zone switching first, then the open dialog, then the
//! focused zone's reducer, and finally the derived rebuilds and clamping.

use tracing::{debug, info};

use crate::filesystem::{FileEntry, FileSort, FileTree, NodeId};
use crate::report::{FileViewMode, ImageReport, ViewMode, collect_entries, filter_entries};
use crate::view::{
    CommandDialog, Event, FileList, FileListItem, FilePaneState, FocusCoordinator, Key,
    LayerListState, Page, Paginator, SelectionModel, ToolbarState, TreePaneState, Zone, ZoneAction,
};

pub const NO_MATCHES: &str = "No files match filter";
pub const EMPTY_LAYER: &str = "No files in this layer";
pub const EMPTY_DIRECTORY: &str = "No files in this directory";

/// Starting point of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub layer: usize,
    pub view_mode: ViewMode,
    pub file_view: FileViewMode,
    pub filter: String,
    pub row_height: f64,
    pub reserved_height: f64,
    pub viewport_height: f64,
}

/// One row of the tree pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: usize,
}

#[derive(Debug)]
pub struct ReportSession {
    report: ImageReport,
    layer: usize,
    view_mode: ViewMode,
    file_view: FileViewMode,
    filter: String,

    entries: Vec<FileEntry>,
    tree: FileTree,
    selection: SelectionModel,
    file_sort: FileSort,
    file_list: FileList,
    generation: u64,
    paginator: Paginator,

    focus: FocusCoordinator,
    toolbar: ToolbarState,
    layers: LayerListState,
    tree_pane: TreePaneState,
    file_pane: FilePaneState,
    dialog: Option<CommandDialog>,
}

fn zones_for(file_view: FileViewMode) -> Vec<Zone> {
    match file_view {
        FileViewMode::Tree => vec![Zone::Toolbar, Zone::LayerList, Zone::TreePane, Zone::FilePane],
        FileViewMode::Files => vec![Zone::Toolbar, Zone::LayerList, Zone::FilePane],
    }
}

impl ReportSession {
    pub fn new(report: ImageReport, options: SessionOptions) -> Self {
        let layer = options.layer.min(report.layer_count().saturating_sub(1));
        let mut paginator = Paginator::new(options.row_height, options.reserved_height);
        paginator.set_available_height(options.viewport_height);
        let file_sort = options.file_view.default_sort();

        let mut session = Self {
            report,
            layer,
            view_mode: options.view_mode,
            file_view: options.file_view,
            filter: options.filter,
            entries: Vec::new(),
            tree: FileTree::default(),
            selection: SelectionModel::new(),
            file_sort,
            file_list: FileList::new(Vec::new(), file_sort, 0),
            generation: 0,
            paginator,
            focus: FocusCoordinator::new(zones_for(options.file_view)),
            toolbar: ToolbarState::default(),
            layers: LayerListState { cursor: layer },
            tree_pane: TreePaneState::default(),
            file_pane: FilePaneState::default(),
            dialog: None,
        };
        session.rebuild_source();
        session.sync();
        session
    }

    pub fn handle(&mut self, event: Event) {
        debug!("Handling event {}", event);
        match event {
            Event::Resize { height } => self.paginator.set_available_height(height),
            Event::Key(key) => self.handle_key(key),
        }
        self.sync();
    }

    fn handle_key(&mut self, key: Key) {
        if self.focus.navigate(key, self.dialog.is_some()).is_some() {
            return;
        }
        if let Some(dialog) = self.dialog.take() {
            self.dialog = dialog.reduce(key);
            if self.dialog.is_none() {
                debug!("Command dialog closed");
            }
            return;
        }

        let Some(zone) = self.focus.focused_zone() else {
            debug!("No zone focused, ignoring key {}", key);
            return;
        };
        let action = match zone {
            Zone::Toolbar => {
                let (state, action) = self.toolbar.reduce(key);
                self.toolbar = state;
                action
            }
            Zone::LayerList => {
                let (state, action) = self.layers.reduce(key, self.report.layer_count());
                self.layers = state;
                action
            }
            Zone::TreePane => {
                let (state, action) = self.tree_pane.reduce(key, self.tree_rows().len());
                self.tree_pane = state;
                action
            }
            Zone::FilePane => {
                let rows = self.current_page().items.len();
                let (state, action) = self.file_pane.reduce(key, rows);
                self.file_pane = state;
                action
            }
        };

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: ZoneAction) {
        debug!("Applying {:?}", action);
        let item_count = self.file_list.len();
        match action {
            ZoneAction::ToggleViewMode => {
                self.view_mode = self.view_mode.toggled();
                info!("View mode changed to {}", self.view_mode);
                self.rebuild_source();
            }
            ZoneAction::ToggleFileView => {
                self.file_view = self.file_view.toggled();
                self.file_sort = self.file_view.default_sort();
                self.focus.register_zones(zones_for(self.file_view));
                info!("File view changed to {}", self.file_view);
                self.rebuild_source();
            }
            ZoneAction::FilterPush(c) => {
                self.filter.push(c);
                self.rebuild_source();
            }
            ZoneAction::FilterPop => {
                if self.filter.pop().is_some() {
                    self.rebuild_source();
                }
            }
            ZoneAction::SelectLayer(index) => self.select_layer(index),
            ZoneAction::OpenCommand(index) => self.open_command(index),
            ZoneAction::ActivateTreeRow(row) => self.activate_tree_row(row),
            ZoneAction::ExpandAll => self.selection.expand_all(&self.tree),
            ZoneAction::CollapseAll => self.selection.collapse_all(),
            ZoneAction::PreviousPage => self.paginator.previous(item_count),
            ZoneAction::NextPage => self.paginator.next(item_count),
            ZoneAction::FirstPage => self.paginator.first(),
            ZoneAction::LastPage => self.paginator.last(item_count),
            ZoneAction::SortBy(key) => {
                self.file_sort = self.file_sort.toggled(key);
                self.generation += 1;
                self.file_list.resort(self.file_sort, self.generation);
                debug!("File list sorted by {}", self.file_sort);
            }
        }
    }

    fn select_layer(&mut self, index: usize) {
        if index == self.layer || index >= self.report.layer_count() {
            return;
        }
        self.layer = index;
        info!("Switched to layer {}", index);
        self.rebuild_source();
    }

    fn open_command(&mut self, index: usize) {
        match self.report.layer(index).and_then(|layer| layer.created_by.as_deref()) {
            Some(command) => {
                debug!("Opening command dialog for layer {}", index);
                self.dialog = Some(CommandDialog::new(index, command));
            }
            None => debug!("Layer {} has no recorded command", index),
        }
    }

    fn activate_tree_row(&mut self, row: usize) {
        let Some(row) = self.tree_rows().get(row).copied() else {
            return;
        };
        let before = self.selection.active_directory(&self.tree).id();
        if row.id == NodeId::ROOT {
            self.selection.select_root();
        } else {
            self.selection.select(row.id);
        }
        if self.selection.active_directory(&self.tree).id() != before {
            self.refresh_file_list();
        }
    }

    /// Recomputes the entry set and everything derived from it.
    fn rebuild_source(&mut self) {
        let entries = collect_entries(&self.report, self.layer, self.view_mode);
        self.entries = filter_entries(entries, &self.filter);
        self.tree = FileTree::build(&self.entries);
        self.selection.reset();
        self.tree_pane = TreePaneState::default();
        info!(
            "Rebuilt view of layer {} ({}): {} entries, {} nodes",
            self.layer,
            self.view_mode,
            self.entries.len(),
            self.tree.node_count()
        );
        self.refresh_file_list();
    }

    fn refresh_file_list(&mut self) {
        let items: Vec<FileListItem> = match self.file_view {
            FileViewMode::Tree => self
                .selection
                .visible_file_children(&self.tree)
                .into_iter()
                .map(FileListItem::from)
                .collect(),
            FileViewMode::Files => self.entries.iter().map(FileListItem::from).collect(),
        };
        self.generation += 1;
        self.file_list = FileList::new(items, self.file_sort, self.generation);
        self.file_pane = FilePaneState::default();
    }

    fn sync(&mut self) {
        self.paginator.observe_source(self.file_list.generation());
        let rows_on_page = self.paginator.current(self.file_list.items()).items.len();
        self.file_pane = self.file_pane.clamped(rows_on_page);
        self.layers = self.layers.clamped(self.report.layer_count());
        self.tree_pane = self.tree_pane.clamped(self.tree_rows().len());
    }

    /// Pointer-style focus of a zone. Ignored for zones that are not mounted.
    #[cfg(test)]
    pub fn focus(&mut self, zone: Zone) -> bool {
        self.focus.focus(zone)
    }

    pub fn report(&self) -> &ImageReport {
        &self.report
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn file_view(&self) -> FileViewMode {
        self.file_view
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn file_list(&self) -> &FileList {
        &self.file_list
    }

    pub fn current_page(&self) -> Page<'_, FileListItem> {
        self.paginator.view(self.file_list.items())
    }

    pub fn zones(&self) -> &[Zone] {
        self.focus.zones()
    }

    pub fn focused_zone(&self) -> Option<Zone> {
        self.focus.focused_zone()
    }

    pub fn toolbar(&self) -> ToolbarState {
        self.toolbar
    }

    pub fn layer_cursor(&self) -> usize {
        self.layers.cursor
    }

    pub fn tree_cursor(&self) -> usize {
        self.tree_pane.cursor
    }

    pub fn file_cursor(&self) -> usize {
        self.file_pane.cursor
    }

    pub fn dialog(&self) -> Option<&CommandDialog> {
        self.dialog.as_ref()
    }

    /// Root row followed by the visible directories in navigation order.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let root = TreeRow {
            id: NodeId::ROOT,
            depth: 0,
        };
        std::iter::once(root)
            .chain(
                self.selection
                    .visible_directory_order(&self.tree)
                    .into_iter()
                    .map(|id| TreeRow {
                        id,
                        depth: self.depth_of(id),
                    }),
            )
            .collect()
    }

    fn depth_of(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.tree.get(id).and_then(|node| node.parent());
        while let Some(parent) = current {
            depth += 1;
            current = self.tree.get(parent).and_then(|node| node.parent());
        }
        depth
    }

    /// Placeholder for an empty file list.
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.file_list.is_empty() {
            None
        } else if !self.entries.is_empty() {
            Some(EMPTY_DIRECTORY)
        } else if !self.filter.is_empty() {
            Some(NO_MATCHES)
        } else {
            Some(EMPTY_LAYER)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::SortKey;
    use crate::filesystem::ordering::SortDirection;
    use crate::report::LayerReport;
    use crate::report::image::tests::sample;
    use crate::view::dialog::CommandView;

    fn options() -> SessionOptions {
        SessionOptions {
            layer: 0,
            view_mode: ViewMode::Layer,
            file_view: FileViewMode::Tree,
            filter: String::new(),
            row_height: 24.0,
            reserved_height: 36.0,
            viewport_height: 0.0,
        }
    }

    fn session() -> ReportSession {
        ReportSession::new(sample(), options())
    }

    fn press(session: &mut ReportSession, keys: &[Key]) {
        for &key in keys {
            session.handle(key.into());
        }
    }

    fn names(session: &ReportSession) -> Vec<String> {
        session
            .file_list()
            .items()
            .iter()
            .map(|item| item.name.clone())
            .collect()
    }

    #[test]
    fn starts_on_root_of_first_layer() {
        let session = session();
        assert_eq!(session.layer(), 0);
        assert_eq!(session.zones().len(), 4);
        assert_eq!(session.focused_zone(), None);
        assert_eq!(session.tree().root().size(), 35);
        assert_eq!(names(&session), vec!["d.txt"]);
    }

    #[test]
    fn switching_layer_clears_selection_and_expansion() {
        let mut session = session();
        session.focus(Zone::TreePane);
        press(&mut session, &[Key::Down, Key::Enter]);

        let a = session.tree().child(NodeId::ROOT, "a").unwrap().id();
        assert_eq!(session.selection().selected(), Some(a));
        assert!(session.selection().is_expanded(a));
        assert_eq!(names(&session), vec!["b.txt", "c.txt"]);

        session.focus(Zone::LayerList);
        press(&mut session, &[Key::Down, Key::Enter]);
        assert_eq!(session.layer(), 1);
        assert_eq!(session.selection().selected(), None);
        assert!(session.selection().expanded().is_empty());
        assert_eq!(session.tree_cursor(), 0);
    }

    #[test]
    fn tree_rows_follow_expansion() {
        let mut session = ReportSession::new(
            sample(),
            SessionOptions {
                layer: 1,
                view_mode: ViewMode::Accumulated,
                ..options()
            },
        );
        session.focus(Zone::TreePane);
        assert_eq!(session.tree_rows().len(), 3);

        press(&mut session, &[Key::Char('+')]);
        assert_eq!(session.tree_rows().len(), 3);
        assert!(session.tree_rows().iter().all(|row| row.depth <= 1));

        press(&mut session, &[Key::End, Key::Enter]);
        let etc = session.tree().child(NodeId::ROOT, "etc").unwrap().id();
        assert_eq!(session.selection().selected(), Some(etc));
        assert_eq!(names(&session), vec!["motd"]);
    }

    #[test]
    fn tree_pane_leaves_the_zone_list_in_files_view() {
        let mut session = session();
        session.focus(Zone::Toolbar);
        press(&mut session, &[Key::Right, Key::Enter]);

        assert_eq!(session.file_view(), FileViewMode::Files);
        assert_eq!(
            session.zones(),
            &[Zone::Toolbar, Zone::LayerList, Zone::FilePane]
        );
        assert_eq!(session.focused_zone(), Some(Zone::Toolbar));
        assert!(!session.focus(Zone::TreePane));

        press(&mut session, &[Key::Tab, Key::Tab]);
        assert_eq!(session.focused_zone(), Some(Zone::FilePane));
        press(&mut session, &[Key::Tab]);
        assert_eq!(session.focused_zone(), Some(Zone::Toolbar));
    }

    #[test]
    fn files_view_lists_full_paths_by_size() {
        let session = ReportSession::new(
            sample(),
            SessionOptions {
                file_view: FileViewMode::Files,
                ..options()
            },
        );
        assert_eq!(names(&session), vec!["a/c.txt", "a/b.txt", "d.txt"]);
        assert_eq!(session.file_list().sort(), FileSort::new(SortKey::Size));
    }

    #[test]
    fn switching_file_view_resets_sort() {
        let mut session = session();
        session.focus(Zone::FilePane);
        press(&mut session, &[Key::Char('n')]);
        assert_eq!(session.file_list().sort().direction, SortDirection::Descending);

        session.focus(Zone::Toolbar);
        press(&mut session, &[Key::Right, Key::Enter]);
        assert_eq!(session.file_list().sort(), FileSort::new(SortKey::Size));
    }

    #[test]
    fn open_dialog_captures_zone_switch_keys() {
        let mut session = session();
        session.focus(Zone::LayerList);
        press(&mut session, &[Key::Down, Key::Char('c')]);

        let dialog = session.dialog().unwrap();
        assert_eq!(dialog.title(), "Layer 2 Command");
        assert_eq!(dialog.text(), "RUN rm /a/b.txt\n&& touch /etc/motd");

        press(&mut session, &[Key::Tab]);
        assert_eq!(session.focused_zone(), Some(Zone::LayerList));
        assert_eq!(session.dialog().unwrap().view(), CommandView::Original);

        press(&mut session, &[Key::Down]);
        assert_eq!(session.layer_cursor(), 1);

        press(&mut session, &[Key::Escape]);
        assert!(session.dialog().is_none());
        press(&mut session, &[Key::Tab]);
        assert_eq!(session.focused_zone(), Some(Zone::TreePane));
    }

    #[test]
    fn layer_without_command_opens_nothing() {
        let mut session = session();
        session.focus(Zone::LayerList);
        press(&mut session, &[Key::End, Key::Char('c')]);
        assert!(session.dialog().is_none());
    }

    #[test]
    fn sorting_returns_to_first_page() {
        let mut session = ReportSession::new(
            sample(),
            SessionOptions {
                file_view: FileViewMode::Files,
                ..options()
            },
        );
        session.focus(Zone::FilePane);
        press(&mut session, &[Key::Right, Key::Right]);
        assert_eq!(session.current_page().page, 2);

        press(&mut session, &[Key::Char('n')]);
        let page = session.current_page();
        assert_eq!(page.page, 0);
        assert_eq!(page.items[0].name, "a/b.txt");
    }

    #[test]
    fn resize_keeps_the_page_when_it_still_exists() {
        let mut session = ReportSession::new(
            sample(),
            SessionOptions {
                file_view: FileViewMode::Files,
                ..options()
            },
        );
        session.focus(Zone::FilePane);
        press(&mut session, &[Key::End]);
        assert_eq!(session.current_page().page, 2);

        session.handle(Event::Resize { height: 84.0 });
        let page = session.current_page();
        assert_eq!(page.per_page, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn filter_edits_rebuild_the_tree() {
        let mut session = session();
        session.focus(Zone::Toolbar);
        press(&mut session, &[Key::Right, Key::Right, Key::Char('C')]);
        assert_eq!(session.filter(), "C");
        assert_eq!(session.entries().len(), 1);
        assert_eq!(session.tree().root().size(), 20);
        assert_eq!(session.empty_message(), Some(EMPTY_DIRECTORY));

        press(&mut session, &[Key::Char('z')]);
        assert_eq!(session.empty_message(), Some(NO_MATCHES));

        press(&mut session, &[Key::Backspace, Key::Backspace]);
        assert_eq!(session.entries().len(), 3);
        assert_eq!(session.empty_message(), None);
    }

    #[test]
    fn empty_layer_has_its_own_message() {
        let session = ReportSession::new(
            sample(),
            SessionOptions {
                layer: 2,
                ..options()
            },
        );
        assert_eq!(session.empty_message(), Some(EMPTY_LAYER));
    }

    #[test]
    fn accumulated_toggle_pulls_in_earlier_layers() {
        let mut session = ReportSession::new(
            sample(),
            SessionOptions {
                layer: 1,
                ..options()
            },
        );
        assert_eq!(session.entries().len(), 2);

        session.focus(Zone::Toolbar);
        press(&mut session, &[Key::Enter]);
        assert_eq!(session.view_mode(), ViewMode::Accumulated);
        assert_eq!(session.entries().len(), 5);
        let a = session.tree().child(NodeId::ROOT, "a").unwrap();
        assert_eq!(a.child_count(), 3);
    }

    #[test]
    fn reselecting_active_directory_keeps_page() {
        let mut report = sample();
        report.layers = vec![LayerReport {
            digest: "sha256:0000000000000000".to_string(),
            created_by: None,
            size: 3,
            files: vec![
                FileEntry::new("x/1", 1, false),
                FileEntry::new("x/2", 1, false),
                FileEntry::new("x/3", 1, false),
            ],
        }];
        let mut session = ReportSession::new(report, options());
        session.focus(Zone::TreePane);
        press(&mut session, &[Key::Down, Key::Enter]);

        session.focus(Zone::FilePane);
        press(&mut session, &[Key::PageDown]);
        assert_eq!(session.current_page().page, 1);

        session.focus(Zone::TreePane);
        press(&mut session, &[Key::Enter]);
        assert!(session.selection().expanded().is_empty());
        assert_eq!(session.current_page().page, 1);
    }

    #[test]
    fn keys_without_focus_are_ignored() {
        let mut session = session();
        press(&mut session, &[Key::Down, Key::Enter, Key::Char('c')]);
        assert_eq!(session.layer(), 0);
        assert!(session.dialog().is_none());
    }
}
