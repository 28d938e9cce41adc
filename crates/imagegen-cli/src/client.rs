//! HTTP client for the A2A server

use eventsource_stream::Eventsource;
use futures::StreamExt;
use imagegen_tools::ImageResult;
use serde::Deserialize;
use serde_json::{json, Value};
use std::pin::Pin;
use tokio_stream::Stream;

/// Client-side errors, split so callers can tell a broken call from a bad answer
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Agent returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// The parts of the agent card the client cares about
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCardInfo {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    #[serde(default)]
    pub default_output_modes: Vec<String>,
}

/// One server-sent event, unwrapped from its JSON-RPC envelope
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Task status change
    Status {
        state: String,
        is_final: bool,
        text: Option<String>,
    },
    /// Agent message; `text` is the joined text parts
    Message { text: String },
}

impl StreamEvent {
    /// Interpret a JSON-RPC response envelope
    pub fn from_envelope(envelope: &Value) -> Result<Self> {
        if let Some(error) = envelope.get("error") {
            return Err(ClientError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }

        let result = envelope
            .get("result")
            .ok_or_else(|| ClientError::Parse("envelope has no result".to_string()))?;

        match result.get("kind").and_then(Value::as_str) {
            Some("message") => Ok(Self::Message {
                text: text_parts(result),
            }),
            Some("status-update") => {
                let status = result.get("status").cloned().unwrap_or(Value::Null);
                Ok(Self::Status {
                    state: status
                        .get("state")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string(),
                    is_final: result.get("final").and_then(Value::as_bool).unwrap_or(false),
                    text: status.get("message").map(text_parts),
                })
            }
            other => Err(ClientError::Parse(format!(
                "unexpected result kind {:?}",
                other
            ))),
        }
    }
}

fn text_parts(message: &Value) -> String {
    message
        .get("parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter(|p| p.get("kind").and_then(Value::as_str) == Some("text"))
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Parse an agent reply into an image record, ignoring ```json fences
pub fn extract_image_result(text: &str) -> Result<ImageResult> {
    let cleaned = text.replace("```json", "").replace("```", "");
    serde_json::from_str(cleaned.trim()).map_err(|e| ClientError::Parse(e.to_string()))
}

/// A2A server client
pub struct A2AClient {
    base_url: String,
    client: reqwest::Client,
}

impl A2AClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the agent card
    pub async fn agent_card(&self) -> Result<AgentCardInfo> {
        let url = format!("{}/.well-known/agent.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<AgentCardInfo>().await?)
    }

    /// Send a prompt with `message/stream` and yield the server's events
    pub async fn send_message_streaming(
        &self,
        prompt: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": uuid::Uuid::new_v4().to_string(),
            "method": "message/stream",
            "params": {
                "message": {
                    "role": "user",
                    "parts": [{ "kind": "text", "text": prompt }],
                    "messageId": uuid::Uuid::new_v4().to_string(),
                    "kind": "message"
                },
                "configuration": { "acceptedOutputModes": ["text"] }
            }
        });

        let response = self
            .client
            .post(format!("{}/", self.base_url))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let is_sse = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("text/event-stream"))
            .unwrap_or(false);

        // Parameter errors come back as a single JSON body instead of a stream
        if !is_sse {
            let envelope: Value = response.json().await?;
            let event = StreamEvent::from_envelope(&envelope);
            return Ok(Box::pin(futures::stream::once(async move { event })));
        }

        let stream = response.bytes_stream().eventsource().map(|event| match event {
            Ok(event) => {
                let envelope: Value = serde_json::from_str(&event.data)
                    .map_err(|e| ClientError::Parse(format!("Failed to parse event: {}", e)))?;
                StreamEvent::from_envelope(&envelope)
            }
            Err(e) => Err(ClientError::Stream(e.to_string())),
        });

        Ok(Box::pin(stream))
    }
}
