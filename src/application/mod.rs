mod application;
mod event_source;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use event_source::{EventSource, EventSourceError};
pub use runtime_config::{RunMode, RuntimeConfig, ViewRequest};
