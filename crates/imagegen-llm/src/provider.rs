//! LLM Provider trait definition

use async_trait::async_trait;

use crate::{Message, Response, Result};

/// Trait for LLM providers
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send a conversation and wait for the complete response
    async fn send_message(&self, messages: Vec<Message>) -> Result<Response>;

    /// Send a conversation with tools and get the raw JSON response
    ///
    /// The response may contain tool calls in the OpenAI
    /// `choices[0].message.tool_calls` shape.
    async fn send_message_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value>;

    /// Model name/identifier
    fn model(&self) -> &str;

    /// Provider name
    fn name(&self) -> &str;
}
