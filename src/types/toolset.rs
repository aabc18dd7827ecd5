use super::message::ToolDescriptor;
use super::tool::{Tool, ToolExecutionError};
use super::tool_object::{ToolObject, ValidationError};

use schemars::JsonSchema;
use serde::de::Deserialize;
use serde_json::Value;
use std::collections::hash_map::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolSetCreationError {
    #[error("error validating schema")]
    Validation(ValidationError),
    #[error("two or more tools have the same name: {0}")]
    NameConflict(String),
}

#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("tool {0} is not in the registry")]
    UnknownTool(String),
    #[error("could not deserialize tool arguments (possible hallucination): {0}")]
    Arguments(serde_json::Error),
    #[error(transparent)]
    Execution(#[from] ToolExecutionError),
}

/// The static tool registry: name → executable adapter, plus the descriptors
/// advertised to the inference server.
#[derive(Default)]
pub struct ToolSet {
    order: Vec<String>,
    tools: HashMap<String, ToolObject>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            order: vec![],
            tools: HashMap::new(),
        }
    }

    pub fn add_tool<T>(mut self) -> Result<Self, ToolSetCreationError>
    where
        T: JsonSchema + Tool + for<'de> Deserialize<'de> + 'static,
    {
        let tool_object =
            ToolObject::try_from_tool::<T>().map_err(ToolSetCreationError::Validation)?;
        if self.tools.contains_key(&tool_object.name) {
            return Err(ToolSetCreationError::NameConflict(tool_object.name));
        }
        self.order.push(tool_object.name.clone());
        self.tools.insert(tool_object.name.clone(), tool_object);
        Ok(self)
    }

    /// Descriptors for the selected tool names, in registration order. An
    /// empty selection advertises nothing; a name missing from the registry
    /// is an error.
    pub fn descriptors(&self, selected: &[String]) -> Result<Vec<ToolDescriptor>, ToolCallError> {
        for name in selected {
            if !self.tools.contains_key(name.as_str()) {
                return Err(ToolCallError::UnknownTool(name.clone()));
            }
        }
        Ok(self
            .order
            .iter()
            .filter(|name| selected.iter().any(|wanted| wanted == *name))
            .map(|name| ToolDescriptor::from(&self.tools[name]))
            .collect())
    }

    pub async fn dispatch(&self, name: &str, arguments: &Value) -> Result<String, ToolCallError> {
        let object = self
            .tools
            .get(name)
            .ok_or_else(|| ToolCallError::UnknownTool(name.to_owned()))?;
        // a call to a parameterless tool may arrive with null arguments
        let arguments = if arguments.is_null() {
            Value::Object(Default::default())
        } else {
            arguments.clone()
        };
        let tool = object
            .try_deserialize(arguments)
            .map_err(ToolCallError::Arguments)?;
        Ok(tool.apply().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug, serde::Deserialize, JsonSchema)]
    #[schemars(title = "echo", description = "repeat a message")]
    struct Echo {
        #[schemars(description = "the message to repeat")]
        message: String,
    }

    #[async_trait]
    impl Tool for Echo {
        async fn apply(&self) -> Result<String, ToolExecutionError> {
            Ok(self.message.clone())
        }
    }

    #[derive(Debug, serde::Deserialize, JsonSchema)]
    #[schemars(title = "boom", description = "always fails")]
    struct Boom {}

    #[async_trait]
    impl Tool for Boom {
        async fn apply(&self) -> Result<String, ToolExecutionError> {
            Err(ToolExecutionError::Failed("boom".to_string()))
        }
    }

    fn registry() -> ToolSet {
        ToolSet::new()
            .add_tool::<Echo>()
            .expect("echo")
            .add_tool::<Boom>()
            .expect("boom")
    }

    #[test]
    fn empty_selection_advertises_nothing() {
        assert!(registry().descriptors(&[]).unwrap().is_empty());
    }

    #[test]
    fn selection_preserves_registration_order() {
        let names: Vec<_> = registry()
            .descriptors(&["boom".to_string(), "echo".to_string()])
            .unwrap()
            .into_iter()
            .map(|descriptor| descriptor.function.name)
            .collect();
        assert_eq!(names, ["echo", "boom"]);
    }

    #[test]
    fn single_selection_yields_exactly_that_descriptor() {
        let descriptors = registry().descriptors(&["echo".to_string()]).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].kind, "function");
        assert_eq!(descriptors[0].function.name, "echo");
    }

    #[test]
    fn unknown_selection_is_an_error() {
        assert!(matches!(
            registry().descriptors(&["nope".to_string()]),
            Err(ToolCallError::UnknownTool(name)) if name == "nope"
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let result = ToolSet::new()
            .add_tool::<Echo>()
            .unwrap()
            .add_tool::<Echo>();
        assert!(matches!(
            result,
            Err(ToolSetCreationError::NameConflict(name)) if name == "echo"
        ));
    }

    #[tokio::test]
    async fn dispatches_to_the_named_tool() {
        let result = registry()
            .dispatch("echo", &serde_json::json!({"message": "hi"}))
            .await
            .unwrap();
        assert_eq!(result, "hi");
    }

    #[tokio::test]
    async fn unknown_tool_dispatch_fails() {
        assert!(matches!(
            registry().dispatch("nope", &Value::Null).await,
            Err(ToolCallError::UnknownTool(_))
        ));
    }

    #[tokio::test]
    async fn null_arguments_reach_a_parameterless_tool() {
        // boom deserializes from the normalized empty object, then fails
        assert!(matches!(
            registry().dispatch("boom", &Value::Null).await,
            Err(ToolCallError::Execution(_))
        ));
    }

    #[tokio::test]
    async fn mistyped_arguments_are_reported() {
        assert!(matches!(
            registry()
                .dispatch("echo", &serde_json::json!({"message": 3}))
                .await,
            Err(ToolCallError::Arguments(_))
        ));
    }
}
