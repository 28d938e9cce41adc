//! Tool trait definition

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, ToolSchema};

/// Result of a tool execution, as reported back to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool execution was successful
    pub success: bool,

    /// The result data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Machine-readable failure kind (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    /// Create a successful result from serializable data
    pub fn success_data<T: Serialize>(data: T) -> Result<Self> {
        Ok(Self::success(serde_json::to_value(data)?))
    }

    /// Create an error result
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: None,
        }
    }

    /// Create an error result tagged with a failure kind
    pub fn failure<K: Into<String>, S: Into<String>>(kind: K, message: S) -> Self {
        Self {
            error_kind: Some(kind.into()),
            ..Self::error(message)
        }
    }

    /// Render the result the way it is fed back into the conversation
    pub fn to_prompt_text(&self, tool_name: &str) -> String {
        if self.success {
            let data = self
                .data
                .as_ref()
                .map(|d| serde_json::to_string_pretty(d).unwrap_or_default())
                .unwrap_or_default();
            format!("Tool '{}' returned: {}", tool_name, data)
        } else {
            format!(
                "Tool '{}' failed: {}",
                tool_name,
                self.error.as_deref().unwrap_or("Unknown error")
            )
        }
    }
}

/// Trait for tools that can be called by the agent
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name, as exposed to the model. Must match `^[a-zA-Z0-9_-]+$`.
    fn name(&self) -> &str;

    /// Human-readable description included in the model prompt
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters
    fn parameters_schema(&self) -> ToolSchema;

    /// Execute the tool with given parameters
    ///
    /// Returns `Err` for malformed calls (the caller's fault) and a failed
    /// [`ToolResult`] when the tool ran but could not complete.
    async fn execute(&self, params: Value) -> Result<ToolResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success(serde_json::json!({"path": "/tmp/x/fox.png"}));
        assert!(result.success);
        assert!(result.data.is_some());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure("transport", "connection refused");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert_eq!(result.error_kind.as_deref(), Some("transport"));
    }

    #[test]
    fn test_error_kind_skipped_when_absent() {
        let json = serde_json::to_value(ToolResult::error("nope")).unwrap();
        assert!(json.get("error_kind").is_none());
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_success_data() {
        #[derive(Serialize)]
        struct Response {
            written: bool,
        }

        let result = ToolResult::success_data(Response { written: true }).unwrap();
        assert_eq!(result.data.unwrap()["written"], true);
    }

    #[test]
    fn test_prompt_text() {
        let ok = ToolResult::success(serde_json::json!({"path": "/tmp/a.png"}));
        let text = ok.to_prompt_text("image_generator");
        assert!(text.starts_with("Tool 'image_generator' returned:"));
        assert!(text.contains("/tmp/a.png"));

        let failed = ToolResult::error("boom");
        assert_eq!(failed.to_prompt_text("image_generator"), "Tool 'image_generator' failed: boom");
    }
}
