use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::report::{FileViewMode, ViewMode};

const CONFIG_FILE_NAME: &str = ".peel-report.yaml";

/// Default row height of the file list, in pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 24.0;
/// Default height of the sort header above the file rows.
pub const DEFAULT_RESERVED_HEIGHT: f64 = 36.0;

fn get_default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Layout and startup settings of the report viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub row_height: f64,
    pub reserved_height: f64,
    /// Height the file list starts with before any resize; zero means
    /// not measured yet.
    pub viewport_height: f64,
    pub view_mode: ViewMode,
    pub file_view: FileViewMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            reserved_height: DEFAULT_RESERVED_HEIGHT,
            viewport_height: 0.0,
            view_mode: ViewMode::default(),
            file_view: FileViewMode::default(),
        }
    }
}

impl ViewerConfig {
    /// Reads an explicitly requested config file, or the default one in the
    /// working directory if it exists.
    pub async fn read(path: Option<&Path>) -> Result<Self, ViewerConfigError> {
        match path {
            Some(path) => Self::from_path(path).await,
            None => Self::read_or_default(&get_default_config_path()).await,
        }
    }

    pub async fn read_or_default(path: &Path) -> Result<Self, ViewerConfigError> {
        match fs::read(path).await {
            Ok(bytes) => Self::from_bytes(path, &bytes),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("No viewer config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(error) => Err(error).context(ReadSnafu {
                file_path: path.display().to_string(),
            }),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ViewerConfigError> {
        debug!("Opening viewer config: {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        Self::from_bytes(path, &bytes)
    }

    fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self, ViewerConfigError> {
        debug!("Read viewer config: {} bytes", bytes.len());
        let contents = std::str::from_utf8(bytes).ok().context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.try_into()
    }

    fn apply_settings(
        &mut self,
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<(), ViewerConfigError> {
        for (key, value) in top_level.iter() {
            let Yaml::Value(Scalar::String(key)) = key else {
                debug!("Skipping non-string config key: {:?}", key);
                continue;
            };

            let key: &str = key;
            match key {
                "row_height" => self.row_height = parse_positive(key, value)?,
                "reserved_height" => self.reserved_height = parse_number(key, value)?,
                "viewport_height" => self.viewport_height = parse_number(key, value)?,
                "view_mode" => self.view_mode = parse_choice(key, value)?,
                "file_view" => self.file_view = parse_choice(key, value)?,
                other => debug!("Ignoring unknown config key '{}'", other),
            }
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &Yaml) -> Result<f64, ViewerConfigError> {
    match value {
        Yaml::Value(Scalar::Integer(number)) => Ok(*number as f64),
        Yaml::Value(Scalar::FloatingPoint(number)) => Ok(number.0),
        _ => InvalidValueSnafu {
            key,
            expected: "a number",
        }
        .fail(),
    }
}

fn parse_positive(key: &str, value: &Yaml) -> Result<f64, ViewerConfigError> {
    let number = parse_number(key, value)?;
    ensure!(
        number > 0.0,
        InvalidValueSnafu {
            key,
            expected: "a positive number",
        }
    );
    Ok(number)
}

fn parse_choice<T: ValueEnum>(key: &str, value: &Yaml) -> Result<T, ViewerConfigError> {
    value
        .as_str()
        .and_then(|choice| T::from_str(choice, true).ok())
        .context(InvalidValueSnafu {
            key,
            expected: T::value_variants()
                .iter()
                .filter_map(|variant| variant.to_possible_value())
                .map(|possible| possible.get_name().to_string())
                .collect::<Vec<_>>()
                .join(" or "),
        })
}

impl TryFrom<&str> for ViewerConfig {
    type Error = ViewerConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let mut config = Self::default();

        let Some(document) = documents.first() else {
            debug!("Viewer config is empty, using defaults");
            return Ok(config);
        };
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        config.apply_settings(top_level)?;
        debug!("Parsed viewer config: {:?}", config);
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum ViewerConfigError {
    #[snafu(display("Failed to read the viewer config: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The viewer config is not valid UTF-8: {}", file_path))]
    EncodingError { file_path: String },
    #[snafu(display("Failed to parse the viewer config"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the viewer config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config key '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: String },
}
