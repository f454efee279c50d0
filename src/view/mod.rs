//! Interactive view state over a loaded report.
//!
//! Pagination, directory selection and roving zone focus are kept as
//! independent state machines; [`ReportSession`] drives them from a stream of
//! [`Event`] values and [`render_frame`] prints the result.

mod dialog;
mod event;
mod file_list;
mod focus;
mod pagination;
mod render;
mod selection;
mod session;
mod zones;

pub use dialog::CommandDialog;
pub use event::{Event, EventParseError, Key};
pub use file_list::{FileList, FileListItem};
pub use focus::{FocusCoordinator, Zone};
pub use pagination::{Page, Paginator};
pub use render::{render_frame, render_summary, render_tree};
pub use selection::SelectionModel;
pub use session::{ReportSession, SessionOptions};
pub use zones::{
    FilePaneState, LayerListState, ToolbarControl, ToolbarState, TreePaneState, ZoneAction,
};
