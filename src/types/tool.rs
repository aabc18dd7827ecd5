use async_trait::async_trait;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolExecutionError {
    #[error("could not launch {command}: {source}")]
    Launch {
        command: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("i/o with {command} failed: {source}")]
    Io {
        command: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Failed(String),
}

/// An executable capability. The implementing struct is the deserialized
/// argument payload of one call.
#[async_trait]
pub trait Tool: Send + Sync {
    async fn apply(&self) -> Result<String, ToolExecutionError>;
}
