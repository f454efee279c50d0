mod cli;
mod log_level;

pub use cli::{Cli, Command, LayerArgs, ViewArgs};
pub use log_level::LogLevel;
