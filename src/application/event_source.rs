use std::path::{Path, PathBuf};

use compio::{fs, io::compat::AsyncStream, runtime::spawn};
use futures::{AsyncBufReadExt, AsyncRead, StreamExt, io::BufReader};
use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::view::{Event, EventParseError};

/// Where session input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    /// A prepared key script, parsed up front. Any bad line is an error.
    Script(PathBuf),
    /// Lines typed on stdin. Bad lines are reported and skipped.
    Stdin,
}

impl EventSource {
    pub fn new(keys: Option<PathBuf>) -> Self {
        keys.map_or(EventSource::Stdin, EventSource::Script)
    }

    /// Starts delivering events. The receiver ends once the input does.
    pub async fn open(self) -> Result<UnboundedReceiver<Event>, EventSourceError> {
        let (sender, receiver) = mpsc::unbounded::<Event>();
        match self {
            EventSource::Script(path) => {
                let events = read_script(&path).await?;
                info!("Loaded {} events from {}", events.len(), path.display());
                for event in events {
                    // The receiver is still held here, so this cannot fail.
                    let _ = sender.unbounded_send(event);
                }
            }
            EventSource::Stdin => {
                let stream = AsyncStream::new(fs::stdin());
                spawn(forward_lines(stream, sender)).detach();
            }
        }
        Ok(receiver)
    }
}

async fn read_script(path: &Path) -> Result<Vec<Event>, EventSourceError> {
    debug!("Opening key script: {}", path.display());
    let bytes = fs::read(path).await.context(ReadSnafu {
        path: path.to_path_buf(),
    })?;
    parse_script(&String::from_utf8_lossy(&bytes))
}

fn parse_script(contents: &str) -> Result<Vec<Event>, EventSourceError> {
    let mut events = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let parsed = Event::parse_line(line).context(ParseSnafu { line: index + 1 })?;
        events.extend(parsed);
    }
    Ok(events)
}

/// Parses every line of `input` into `sender` until the input ends or the
/// session stops listening.
async fn forward_lines(input: impl AsyncRead + Unpin, sender: UnboundedSender<Event>) {
    let mut lines = BufReader::new(input).lines();
    while let Some(line_result) = lines.next().await {
        let line = match line_result {
            Ok(line) => line,
            Err(error) => {
                warn!("Stopped reading input: {}", error);
                break;
            }
        };
        let events = match Event::parse_line(&line) {
            Ok(events) => events,
            Err(error) => {
                warn!("Skipping input line: {}", error);
                continue;
            }
        };
        for event in events {
            if sender.unbounded_send(event).is_err() {
                debug!("Session ended, no longer reading input");
                return;
            }
        }
    }
    debug!("Reached the end of input");
}

#[derive(Debug, Snafu)]
pub enum EventSourceError {
    #[snafu(display("Failed to read the key script: {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Invalid key script line {}", line))]
    ParseError {
        line: usize,
        source: EventParseError,
    },
}
