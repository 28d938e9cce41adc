//! Parsers for LLM responses: tool calls and the final image record

use imagegen_tools::ImageResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::AgentRuntimeError, Result};

/// A tool call extracted from an LLM response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub name: String,

    /// Parameters for the tool
    pub parameters: Value,

    /// Optional ID for tracking (from LLM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: String, parameters: Value, id: Option<String>) -> Self {
        Self {
            name,
            parameters,
            id,
        }
    }
}

/// Parse OpenAI function calls from a message
///
/// OpenAI-compatible servers return tool calls in this format:
/// ```json
/// {
///   "tool_calls": [{
///     "id": "call_abc",
///     "type": "function",
///     "function": {
///       "name": "image_generator",
///       "arguments": "{\"prompt\": \"a cat\", \"image_name\": \"whiskers\"}"
///     }
///   }]
/// }
/// ```
///
/// Ollama sometimes sends `arguments` as an object instead of a string; both
/// are accepted.
pub fn parse_openai_tool_calls(message: &Value) -> Result<Vec<ToolCall>> {
    let tool_calls = message
        .get("tool_calls")
        .and_then(|v| v.as_array())
        .ok_or_else(|| AgentRuntimeError::parse("No tool_calls array in response"))?;

    let mut parsed_calls = Vec::new();

    for call in tool_calls {
        let id = call.get("id").and_then(|v| v.as_str()).map(|s| s.to_string());

        let function = call
            .get("function")
            .ok_or_else(|| AgentRuntimeError::parse("Missing function field"))?;

        let name = function
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentRuntimeError::parse("Missing function name"))?
            .to_string();

        let parameters = match function.get("arguments") {
            Some(Value::String(raw)) => serde_json::from_str(raw)
                .map_err(|e| AgentRuntimeError::parse(format!("Invalid JSON arguments: {}", e)))?,
            Some(obj @ Value::Object(_)) => obj.clone(),
            _ => return Err(AgentRuntimeError::parse("Missing function arguments")),
        };

        parsed_calls.push(ToolCall {
            name,
            parameters,
            id,
        });
    }

    Ok(parsed_calls)
}

/// Locate the JSON object inside a model answer
///
/// Handles a bare object, a ```json fenced block, and an object surrounded
/// by prose.
pub fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest).trim_end();
        return rest.strip_suffix("```").unwrap_or(rest).trim();
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parse the final answer into an [`ImageResult`]
pub fn parse_image_result(content: &str) -> Result<ImageResult> {
    let block = extract_json_block(content);
    serde_json::from_str(block).map_err(|e| {
        AgentRuntimeError::output(format!("expected name, description and path: {}", e))
    })
}
