use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Browse the layers of a container image report")]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Viewer config file, `.peel-report.yaml` in the working directory if omitted
    #[clap(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the image header and the layer list
    Summary {
        /// Report document produced by the layer inspector
        report: PathBuf,
    },
    /// Print the complete file tree of a layer
    Tree {
        report: PathBuf,
        #[command(flatten)]
        layers: LayerArgs,
    },
    /// Browse a report interactively, one key token per line
    View(ViewArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LayerArgs {
    /// Layer to open, counting from 1
    #[clap(long, default_value_t = 1)]
    pub layer: usize,

    /// Include every layer up to the selected one
    #[clap(long, short)]
    pub accumulated: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    pub report: PathBuf,

    #[command(flatten)]
    pub layers: LayerArgs,

    /// Start in the flat file list instead of the tree
    #[clap(long)]
    pub files: bool,

    /// Initial path filter
    #[clap(long, default_value = "")]
    pub filter: String,

    /// Initial height of the file list, in pixels
    #[clap(long)]
    pub height: Option<f64>,

    /// Read key tokens from this file instead of stdin
    #[clap(long, short)]
    pub keys: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "peel-report",
            "view",
            "report.json",
            "--layer",
            "2",
            "-a",
            "--files",
            "--height",
            "480",
        ])
        .unwrap();

        let Command::View(args) = cli.command else {
            panic!("expected the view command");
        };
        assert_eq!(args.layers.layer, 2);
        assert!(args.layers.accumulated);
        assert!(args.files);
        assert_eq!(args.height, Some(480.0));
        assert_eq!(args.keys, None);
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "peel-report",
            "summary",
            "report.json",
            "--log-level",
            "debug",
            "--config",
            "viewer.yaml",
        ])
        .unwrap();
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert_eq!(cli.config, Some(PathBuf::from("viewer.yaml")));
    }

    #[test]
    fn report_path_is_required() {
        assert!(Cli::try_parse_from(["peel-report", "tree"]).is_err());
    }
}
