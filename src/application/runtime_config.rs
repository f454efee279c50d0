use std::path::PathBuf;

use crate::cli::{Cli, Command, LayerArgs, ViewArgs};
use crate::config::ViewerConfig;
use crate::report::{FileViewMode, ViewMode};
use crate::view::SessionOptions;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub config_path: Option<PathBuf>,
    pub mode: RunMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    Summary { report: PathBuf },
    Tree { report: PathBuf, layers: LayerSelection },
    View(ViewRequest),
}

/// Layer as given on the command line, counting from 1, and the view mode
/// override if one was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSelection {
    pub layer: usize,
    pub view_mode: Option<ViewMode>,
}

impl LayerSelection {
    pub fn view_mode(&self, config: &ViewerConfig) -> ViewMode {
        self.view_mode.unwrap_or(config.view_mode)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewRequest {
    pub report: PathBuf,
    pub layers: LayerSelection,
    pub file_view: Option<FileViewMode>,
    pub filter: String,
    pub height: Option<f64>,
    pub keys: Option<PathBuf>,
}

impl ViewRequest {
    /// Session settings with command line values taking precedence over the
    /// config file. `layer_index` is the already validated zero-based layer.
    pub fn session_options(&self, config: &ViewerConfig, layer_index: usize) -> SessionOptions {
        SessionOptions {
            layer: layer_index,
            view_mode: self.layers.view_mode(config),
            file_view: self.file_view.unwrap_or(config.file_view),
            filter: self.filter.clone(),
            row_height: config.row_height,
            reserved_height: config.reserved_height,
            viewport_height: self.height.unwrap_or(config.viewport_height),
        }
    }
}

impl From<LayerArgs> for LayerSelection {
    fn from(args: LayerArgs) -> Self {
        Self {
            layer: args.layer,
            view_mode: args.accumulated.then_some(ViewMode::Accumulated),
        }
    }
}

impl From<ViewArgs> for ViewRequest {
    fn from(args: ViewArgs) -> Self {
        Self {
            report: args.report,
            layers: args.layers.into(),
            file_view: args.files.then_some(FileViewMode::Files),
            filter: args.filter,
            height: args.height,
            keys: args.keys,
        }
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let mode = match cli.command {
            Command::Summary { report } => RunMode::Summary { report },
            Command::Tree { report, layers } => RunMode::Tree {
                report,
                layers: layers.into(),
            },
            Command::View(args) => RunMode::View(args.into()),
        };
        Self {
            config_path: cli.config,
            mode,
        }
    }
}
