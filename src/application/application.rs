use std::path::Path;

use futures::StreamExt;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{EventSource, EventSourceError, RunMode, RuntimeConfig, ViewRequest};
use crate::config::{ViewerConfig, ViewerConfigError};
use crate::ext::AsyncTryInto;
use crate::filesystem::FileTree;
use crate::report::{ImageReport, ReportLoadError, collect_entries};
use crate::view::{ReportSession, render_frame, render_summary, render_tree};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let config = ViewerConfig::read(app_config.config_path.as_deref())
            .await
            .context(ViewerConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        match app_config.mode {
            RunMode::Summary { report } => {
                let report = load_report(&report).await?;
                print!("{}", render_summary(&report));
            }
            RunMode::Tree { report, layers } => {
                let report = load_report(&report).await?;
                let index = layer_index(&report, layers.layer)?;
                let entries = collect_entries(&report, index, layers.view_mode(&config));
                print!("{}", render_tree(&FileTree::build(&entries)));
            }
            RunMode::View(request) => Self::view(&config, request).await?,
        }

        Ok(())
    }

    async fn view(config: &ViewerConfig, request: ViewRequest) -> Result<(), ApplicationError> {
        let report = load_report(&request.report).await?;
        let index = layer_index(&report, request.layers.layer)?;
        let options = request.session_options(config, index);

        let mut events = EventSource::new(request.keys)
            .open()
            .await
            .context(EventSourceSnafu)?;
        let mut session = ReportSession::new(report, options);
        println!("{}", render_frame(&session));

        let mut handled = 0usize;
        while let Some(event) = events.next().await {
            session.handle(event);
            handled += 1;
            println!("{}", render_frame(&session));
        }
        info!("Session finished after {} events", handled);
        Ok(())
    }
}

async fn load_report(path: &Path) -> Result<ImageReport, ApplicationError> {
    let report: Result<ImageReport, _> = path.async_try_into().await;
    report.context(ReportLoadSnafu)
}

/// Converts a layer number counted from 1 into an index into the report.
fn layer_index(report: &ImageReport, layer: usize) -> Result<usize, ApplicationError> {
    let count = report.layer_count();
    ensure!(
        (1..=count).contains(&layer),
        LayerOutOfRangeSnafu { layer, count }
    );
    Ok(layer - 1)
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ViewerConfigError { source: ViewerConfigError },
    #[snafu(display("Critical failure encountered while loading the report"))]
    ReportLoadError { source: ReportLoadError },
    #[snafu(display("Layer {} does not exist, the image has {} layers", layer, count))]
    LayerOutOfRangeError { layer: usize, count: usize },
    #[snafu(display("Critical failure encountered while opening the session input"))]
    EventSourceError { source: EventSourceError },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::application::runtime_config::LayerSelection;
    use crate::report::image::tests::{SAMPLE, sample};

    #[rstest]
    #[case(1, Some(0))]
    #[case(3, Some(2))]
    #[case(0, None)]
    #[case(4, None)]
    fn layer_numbers_count_from_one(#[case] layer: usize, #[case] expected: Option<usize>) {
        assert_eq!(layer_index(&sample(), layer).ok(), expected);
    }

    fn report_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, "{}", SAMPLE).expect("Failed to write temp file");
        file
    }

    fn config_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "row_height: 24").expect("Failed to write temp file");
        file
    }

    #[compio::test]
    async fn view_runs_a_key_script() {
        let report = report_file();
        let config = config_file();
        let mut keys = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(keys, "tab\ntab\ndown\nenter\nresize:300").expect("Failed to write temp file");

        let runtime = RuntimeConfig {
            config_path: Some(config.path().to_path_buf()),
            mode: RunMode::View(ViewRequest {
                report: report.path().to_path_buf(),
                layers: LayerSelection {
                    layer: 1,
                    view_mode: None,
                },
                file_view: None,
                filter: String::new(),
                height: None,
                keys: Some(keys.path().to_path_buf()),
            }),
        };
        Application::run(runtime).await.unwrap();
    }

    #[compio::test]
    async fn out_of_range_layer_fails() {
        let report = report_file();
        let config = config_file();
        let runtime = RuntimeConfig {
            config_path: Some(config.path().to_path_buf()),
            mode: RunMode::Tree {
                report: report.path().to_path_buf(),
                layers: LayerSelection {
                    layer: 7,
                    view_mode: None,
                },
            },
        };
        let result = Application::run(runtime).await;
        assert!(matches!(
            result,
            Err(ApplicationError::LayerOutOfRangeError { layer: 7, count: 3 })
        ));
    }

    #[compio::test]
    async fn missing_report_fails_to_load() {
        let config = config_file();
        let runtime = RuntimeConfig {
            config_path: Some(config.path().to_path_buf()),
            mode: RunMode::Summary {
                report: "/nonexistent/report.json".into(),
            },
        };
        let result = Application::run(runtime).await;
        assert!(matches!(result, Err(ApplicationError::ReportLoadError { .. })));
    }
}
