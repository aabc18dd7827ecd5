use super::message::{FunctionDescriptor, ToolDescriptor};
use super::tool::Tool;

use schemars::JsonSchema;
use schemars::schema::{Schema, SchemaObject};
use schemars::schema_for;
use serde::de::Deserialize;
use serde_json::Error as JsonError;
use serde_json::Value;
use thiserror::Error;

type ToolTraitObject = Box<dyn Tool>;
type Deserializer = Box<dyn Fn(Value) -> Result<ToolTraitObject, JsonError> + Send + Sync>;

/// A registered tool: the descriptor material advertised to the server plus
/// the deserializer that turns call arguments into something executable.
pub struct ToolObject {
    pub json_schema: Value,
    pub description: String,
    pub name: String,
    deserializer: Deserializer,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("schema is missing title or description metadata")]
    MissingMetadata,
    #[error("could not convert schema to json")]
    JsonSerialization(JsonError),
}

impl ToolObject {
    pub fn try_deserialize(&self, arguments: Value) -> Result<ToolTraitObject, JsonError> {
        let deserializer = &self.deserializer;
        deserializer(arguments)
    }

    pub fn try_from_tool<T>() -> Result<Self, ValidationError>
    where
        T: JsonSchema + Tool + for<'de> Deserialize<'de> + 'static,
    {
        let schema = schema_for!(T);

        let (name, description) = validate_tool_schema(&schema.schema)?;

        let json_schema =
            serde_json::to_value(schema).map_err(ValidationError::JsonSerialization)?;

        let deserializer = Box::new(|arguments: Value| {
            serde_json::from_value::<T>(arguments).map(|tool| Box::new(tool) as ToolTraitObject)
        });

        Ok(Self {
            name,
            json_schema,
            description,
            deserializer,
        })
    }
}

impl From<&ToolObject> for ToolDescriptor {
    fn from(value: &ToolObject) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDescriptor {
                name: value.name.clone(),
                description: value.description.clone(),
                parameters: value.json_schema.clone(),
            },
        }
    }
}

fn validate_tool_schema(schema: &SchemaObject) -> Result<(String, String), ValidationError> {
    let name = schema
        .metadata
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .title
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .to_string();

    let description = validate_tool_description(schema)?;
    Ok((name, description))
}

// every parameter must describe itself to the model, not just the tool
fn validate_tool_description(schema: &SchemaObject) -> Result<String, ValidationError> {
    let description = schema
        .metadata
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .description
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?;

    if let Some(object) = schema.object.as_deref() {
        for sub_schema in object.properties.values() {
            if let Schema::Object(sub_schema_object) = sub_schema {
                validate_tool_description(sub_schema_object)?;
            }
        }
    }

    Ok(description.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tool::ToolExecutionError;
    use async_trait::async_trait;

    #[derive(Debug, serde::Deserialize, JsonSchema)]
    #[schemars(title = "shout", description = "uppercase a word")]
    struct Shout {
        #[schemars(description = "the word to uppercase")]
        word: String,
    }

    #[async_trait]
    impl Tool for Shout {
        async fn apply(&self) -> Result<String, ToolExecutionError> {
            Ok(self.word.to_uppercase())
        }
    }

    #[derive(Debug, serde::Deserialize, JsonSchema)]
    struct Undocumented {
        word: String,
    }

    #[async_trait]
    impl Tool for Undocumented {
        async fn apply(&self) -> Result<String, ToolExecutionError> {
            Ok(self.word.clone())
        }
    }

    #[test]
    fn takes_name_and_description_from_schema_metadata() {
        let object = ToolObject::try_from_tool::<Shout>().unwrap();
        assert_eq!(object.name, "shout");
        assert_eq!(object.description, "uppercase a word");
    }

    #[test]
    fn rejects_a_tool_without_metadata() {
        assert!(matches!(
            ToolObject::try_from_tool::<Undocumented>(),
            Err(ValidationError::MissingMetadata)
        ));
    }

    #[test]
    fn descriptor_has_the_wire_shape() {
        let object = ToolObject::try_from_tool::<Shout>().unwrap();
        let value = serde_json::to_value(ToolDescriptor::from(&object)).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "shout");
        assert_eq!(value["function"]["parameters"]["type"], "object");
        assert_eq!(
            value["function"]["parameters"]["required"],
            serde_json::json!(["word"])
        );
    }

    #[tokio::test]
    async fn deserialized_tool_is_callable() {
        let object = ToolObject::try_from_tool::<Shout>().unwrap();
        let tool = object
            .try_deserialize(serde_json::json!({"word": "hi"}))
            .unwrap();
        assert_eq!(tool.apply().await.unwrap(), "HI");
    }
}
