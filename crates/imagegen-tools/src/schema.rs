//! JSON Schema description of tool parameters

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolSchema {
    /// Always "object" for tool parameters
    #[serde(rename = "type")]
    pub schema_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolSchema {
    /// Create an empty object schema
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: None,
            required: None,
            description: None,
        }
    }

    /// Build a schema from a type deriving `JsonSchema`
    pub fn from_type<T: JsonSchema>() -> Self {
        let root = schemars::schema_for!(T);
        let object = root.schema.object.as_ref();

        let properties = object
            .map(|o| serde_json::to_value(&o.properties))
            .transpose()
            .ok()
            .flatten();
        let required: Option<Vec<String>> = object
            .map(|o| o.required.iter().cloned().collect())
            .filter(|r: &Vec<String>| !r.is_empty());
        let description = root
            .schema
            .metadata
            .as_ref()
            .and_then(|m| m.description.clone());

        Self {
            schema_type: "object".to_string(),
            properties,
            required,
            description,
        }
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_required(mut self, required: Vec<String>) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Convert to OpenAI function format
    pub fn to_openai_function(&self, name: &str, description: &str) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": name,
                "description": description,
                "parameters": self,
            }
        })
    }
}

impl Default for ToolSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to create a simple property schema
pub fn property(type_name: &str, description: &str) -> Value {
    serde_json::json!({
        "type": type_name,
        "description": description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let schema = ToolSchema::new()
            .with_description("Image parameters")
            .with_properties(serde_json::json!({
                "prompt": property("string", "User prompt"),
            }))
            .with_required(vec!["prompt".to_string()]);

        assert_eq!(schema.schema_type, "object");
        assert!(schema.properties.is_some());
        assert_eq!(schema.required.unwrap(), vec!["prompt".to_string()]);
    }

    #[test]
    fn test_openai_format() {
        let schema = ToolSchema::new().with_properties(serde_json::json!({
            "prompt": property("string", "User prompt"),
        }));

        let func = schema.to_openai_function("image_generator", "Generate images");
        assert_eq!(func["type"], "function");
        assert_eq!(func["function"]["name"], "image_generator");
        assert_eq!(func["function"]["parameters"]["type"], "object");
        assert_eq!(func["function"]["parameters"]["properties"]["prompt"]["type"], "string");
    }

    #[test]
    fn test_from_type() {
        /// Parameters for a lookup
        #[derive(JsonSchema)]
        #[allow(dead_code)]
        struct Lookup {
            /// What to look up
            query: String,
            limit: Option<u32>,
        }

        let schema = ToolSchema::from_type::<Lookup>();
        let properties = schema.properties.unwrap();
        assert_eq!(properties["query"]["type"], "string");
        assert_eq!(properties["query"]["description"], "What to look up");
        assert_eq!(schema.required.unwrap(), vec!["query".to_string()]);
        assert_eq!(schema.description.as_deref(), Some("Parameters for a lookup"));
    }
}
