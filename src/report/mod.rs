//! The image report document and the file views derived from it.

pub(crate) mod image;
mod layer_view;

pub use image::{ImageReport, LayerReport, ReportLoadError};
pub use layer_view::{FileViewMode, ViewMode, collect_entries, filter_entries};
