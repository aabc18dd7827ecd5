use crate::types::{Tool, ToolExecutionError};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::process::Command;

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[schemars(
    title = "current_datetime",
    description = "Get the current date and time on the local machine"
)]
pub struct CurrentDateTime {}

#[async_trait]
impl Tool for CurrentDateTime {
    async fn apply(&self) -> Result<String, ToolExecutionError> {
        let output = Command::new("date")
            .output()
            .await
            .map_err(|source| ToolExecutionError::Launch {
                command: "date",
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolExecutionError::Failed(format!(
                "date exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
