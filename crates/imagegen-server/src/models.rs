//! A2A protocol and JSON-RPC wire models

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

// Agent card

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub capabilities: AgentCapabilities,
    pub skills: Vec<AgentSkill>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
    pub push_notifications: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub examples: Vec<String>,
}

impl AgentCard {
    /// Card advertised by the image generator agent
    pub fn image_generator(name: &str, host: &str, port: u16, modes: &[&str]) -> Self {
        let modes: Vec<String> = modes.iter().map(|m| m.to_string()).collect();
        Self {
            name: name.to_string(),
            description: "Generate images".to_string(),
            url: format!("http://{}:{}/", host, port),
            version: "1.0.0".to_string(),
            default_input_modes: modes.clone(),
            default_output_modes: modes,
            capabilities: AgentCapabilities {
                streaming: true,
                push_notifications: false,
            },
            skills: vec![AgentSkill {
                id: "image_generator".to_string(),
                name: "Image Generator".to_string(),
                description: "Generate images".to_string(),
                tags: vec!["generate image".to_string(), "edit image".to_string()],
                examples: vec![
                    "Generate a photorealisitc image of raspberry lemonade".to_string(),
                ],
            }],
        }
    }
}

// Messages

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
    },
    /// File and data parts are accepted on the wire but carry no text
    #[serde(other)]
    Unsupported,
}

fn message_kind() -> String {
    "message".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default = "message_kind")]
    pub kind: String,
}

impl Message {
    pub fn agent_text(
        text: impl Into<String>,
        context_id: impl Into<String>,
        task_id: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Agent,
            parts: vec![Part::Text { text: text.into() }],
            message_id: uuid::Uuid::new_v4().to_string(),
            context_id: Some(context_id.into()),
            task_id: Some(task_id.into()),
            kind: message_kind(),
        }
    }

    /// Text parts joined by newlines
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::Unsupported => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendConfiguration {
    #[serde(default)]
    pub accepted_output_modes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<MessageSendConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskIdParams {
    pub id: String,
}

// Tasks

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Working,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TaskStatus {
    pub fn new(state: TaskState, message: Option<Message>) -> Self {
        Self {
            state,
            message,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    pub history: Vec<Message>,
    pub kind: String,
}

impl Task {
    pub fn working(id: String, context_id: String, request: Message) -> Self {
        Self {
            id,
            context_id,
            status: TaskStatus::new(TaskState::Working, None),
            history: vec![request],
            kind: "task".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(rename = "final")]
    pub is_final: bool,
    pub kind: String,
}

impl TaskStatusUpdateEvent {
    pub fn new(task: &Task, is_final: bool) -> Self {
        Self {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            status: task.status.clone(),
            is_final,
            kind: "status-update".to_string(),
        }
    }
}

// JSON-RPC envelope

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const TASK_NOT_FOUND: i64 = -32001;
    pub const UNSUPPORTED_OPERATION: i64 = -32004;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(Self::PARSE_ERROR, detail)
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(Self::INVALID_REQUEST, detail)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(Self::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new(Self::INVALID_PARAMS, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL_ERROR, detail)
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(Self::TASK_NOT_FOUND, format!("Task not found: {}", task_id))
    }

    pub fn unsupported_operation(detail: impl Into<String>) -> Self {
        Self::new(Self::UNSUPPORTED_OPERATION, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_card_shape() {
        let card = AgentCard::image_generator("Image Generator Agent", "localhost", 10001, &["text", "text/plain"]);
        let value = serde_json::to_value(&card).unwrap();

        assert_eq!(value["url"], "http://localhost:10001/");
        assert_eq!(value["defaultInputModes"], json!(["text", "text/plain"]));
        assert_eq!(value["capabilities"]["streaming"], true);
        assert_eq!(value["skills"][0]["id"], "image_generator");
        assert_eq!(value["skills"][0]["tags"], json!(["generate image", "edit image"]));
    }

    #[test]
    fn test_message_text_skips_non_text_parts() {
        let message: Message = serde_json::from_value(json!({
            "role": "user",
            "messageId": "m1",
            "parts": [
                {"kind": "text", "text": "Generate an image"},
                {"kind": "file", "file": {"uri": "file:///tmp/a.png"}},
                {"kind": "text", "text": "of a cute cat."}
            ]
        }))
        .unwrap();

        assert_eq!(message.text(), "Generate an image\nof a cute cat.");
        assert_eq!(message.kind, "message");
        assert!(message.context_id.is_none());
    }

    #[test]
    fn test_status_update_final_field() {
        let message = Message::agent_text("hi", "ctx", "task");
        let task = Task::working("task".into(), "ctx".into(), message);
        let value = serde_json::to_value(TaskStatusUpdateEvent::new(&task, false)).unwrap();

        assert_eq!(value["final"], false);
        assert_eq!(value["status"]["state"], "working");
        assert_eq!(value["kind"], "status-update");
    }

    #[test]
    fn test_error_envelope_omits_result() {
        let resp = JsonRpcResponse::failure(json!(1), JsonRpcError::task_not_found("t1"));
        let value = serde_json::to_value(resp).unwrap();

        assert!(value.get("result").is_none());
        assert_eq!(value["error"]["code"], -32001);
    }
}
