use crate::types::{Tool, ToolExecutionError};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(
    title = "calculator",
    description = "Evaluate an arithmetic expression and return its numeric result"
)]
pub struct Calculator {
    #[schemars(description = "the arithmetic expression to evaluate, e.g. \"(2 + 3) * 4\"")]
    pub expression: String,
}

#[async_trait]
impl Tool for Calculator {
    async fn apply(&self) -> Result<String, ToolExecutionError> {
        // the expression goes to bc over stdin and never through a shell, so
        // metacharacters in model-supplied input stay inert text
        let mut child = Command::new("bc")
            .arg("-l")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ToolExecutionError::Launch {
                command: "bc",
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(self.expression.as_bytes())
                .await
                .map_err(|source| ToolExecutionError::Io {
                    command: "bc",
                    source,
                })?;
            stdin
                .write_all(b"\n")
                .await
                .map_err(|source| ToolExecutionError::Io {
                    command: "bc",
                    source,
                })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ToolExecutionError::Io {
                command: "bc",
                source,
            })?;

        // bc reports parse errors on stderr while still exiting 0
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            return Err(ToolExecutionError::Failed(format!(
                "bc rejected the expression: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // bc is not guaranteed on every host running the suite
    fn bc_available() -> bool {
        std::process::Command::new("bc")
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .is_ok()
    }

    #[tokio::test]
    async fn evaluates_a_simple_expression() {
        if !bc_available() {
            return;
        }
        let result = Calculator {
            expression: "2+2".to_string(),
        }
        .apply()
        .await
        .unwrap();
        assert_eq!(result, "4");
    }

    #[tokio::test]
    async fn same_expression_gives_the_same_result() {
        if !bc_available() {
            return;
        }
        let first = Calculator {
            expression: "3*7".to_string(),
        }
        .apply()
        .await
        .unwrap();
        let second = Calculator {
            expression: "3*7".to_string(),
        }
        .apply()
        .await
        .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn shell_metacharacters_are_just_a_syntax_error() {
        if !bc_available() {
            return;
        }
        let result = Calculator {
            expression: "1; rm -rf /".to_string(),
        }
        .apply()
        .await;
        assert!(matches!(result, Err(ToolExecutionError::Failed(_))));
    }
}
