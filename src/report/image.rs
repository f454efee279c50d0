use std::path::{Path, PathBuf};

use compio::fs;
use serde::Deserialize;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::ext::AsyncTryFrom;
use crate::filesystem::FileEntry;

/// Image description produced by the layer inspector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageReport {
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
    pub total_size: u64,
    #[serde(default)]
    pub layers: Vec<LayerReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayerReport {
    pub digest: String,
    #[serde(default)]
    pub created_by: Option<String>,
    pub size: u64,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl ImageReport {
    /// `name:tag`, or just the name for untagged images.
    pub fn reference(&self) -> String {
        match &self.tag {
            Some(tag) => format!("{}:{}", self.name, tag),
            None => self.name.clone(),
        }
    }

    pub fn layer(&self, index: usize) -> Option<&LayerReport> {
        self.layers.get(index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl LayerReport {
    /// Twelve digest characters after the `sha256:` algorithm prefix.
    pub fn short_digest(&self) -> &str {
        let start = self.digest.len().min(7);
        let end = self.digest.len().min(19);
        self.digest.get(start..end).unwrap_or(&self.digest)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl TryFrom<&str> for ImageReport {
    type Error = ReportLoadError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        serde_json::from_str(contents).context(ParseSnafu)
    }
}

impl<'a> AsyncTryFrom<&'a Path> for ImageReport {
    type Error = ReportLoadError;

    async fn async_try_from(path: &'a Path) -> Result<Self, Self::Error> {
        debug!("Opening report file: {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            path: path.to_path_buf(),
        })?;
        debug!("Read report file: {} bytes", bytes.len());

        let report: ImageReport = serde_json::from_slice(&bytes).context(ParseSnafu)?;
        info!(
            "Loaded report for {} with {} layers",
            report.reference(),
            report.layer_count()
        );
        Ok(report)
    }
}

#[derive(Debug, Snafu)]
pub enum ReportLoadError {
    #[snafu(display("Failed to read the report file: {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the report document"))]
    ParseError { source: serde_json::Error },
}
