//! Image creation agent

use imagegen_llm::{LLMProvider, Message};
use imagegen_tools::{ImageResult, ToolError, ToolRegistry, ToolResult};
use serde_json::Value;
use std::sync::Arc;

use crate::{error::AgentRuntimeError, parser, Result};

/// Content types the agent accepts and produces
pub const SUPPORTED_CONTENT_TYPES: &[&str] = &["text", "text/plain"];

const SYSTEM_MESSAGE: &str = "You are an Image Creation Expert.\n\
Your goal: Generate an image using an API based on the user's text prompt. \
If the prompt is vague, make a reasonable interpretation instead of asking \
follow-up questions, since there is no back-and-forth within one run. Focus on \
interpreting the user's request and using the image_generator tool effectively.\n\
Background: You are a digital artist powered by AI. You specialize in taking \
textual descriptions and transforming them into visual representations using \
a powerful image generation tool. You aim for accuracy and creativity based on \
the prompt provided.";

const TASK_TEMPLATE: &str = "Receive a user prompt: '{user_prompt}'.\n\
Analyze the prompt and identify if you need to create a new image or edit an \
existing one. Look for pronouns like this, that etc in the prompt, they might \
provide context; rewrite the prompt to include the context. If creating a new \
image, ignore any images provided as input context. Use the image_generator \
tool for your image creation or modification. The tool expects a prompt, which \
is the user prompt, and the session_id '{session_id}'. You also need to \
generate a fun name for this image and pass it to the tool as image_name. \
This name will be used to save the image.\n\n\
When the tool has run, answer with only a JSON object of the form \
{\"name\": \"<concise name for the image>\", \"description\": \"<brief \
description of what's going on in the image>\", \"path\": \"<path where the \
image was saved>\"}.";

const JSON_REMINDER: &str = "Your answer could not be read. Respond with only a \
JSON object with the fields name, description and path.";

/// Configuration for agent behavior
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum LLM round trips for one request
    pub max_iterations: usize,

    /// Role, goal and backstory
    pub system_message: String,

    /// Task description with `{user_prompt}` and `{session_id}` placeholders
    pub task_template: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            system_message: SYSTEM_MESSAGE.to_string(),
            task_template: TASK_TEMPLATE.to_string(),
        }
    }
}

impl AgentConfig {
    /// Fill the task template for one request
    pub fn render_task(&self, user_prompt: &str, session_id: &str) -> String {
        self.task_template
            .replace("{user_prompt}", user_prompt)
            .replace("{session_id}", session_id)
    }
}

/// Agent that turns a text request into a generated image
pub struct ImageAgent {
    provider: Arc<dyn LLMProvider>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl ImageAgent {
    pub fn builder() -> ImageAgentBuilder {
        ImageAgentBuilder::new()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run one request to completion
    ///
    /// Every call starts a fresh conversation. The loop ends when the model
    /// answers without tool calls and that answer parses as an
    /// [`ImageResult`].
    pub async fn invoke(&self, query: &str, session_id: &str) -> Result<ImageResult> {
        let mut messages = vec![
            Message::system(&self.config.system_message),
            Message::user(self.config.render_task(query, session_id)),
        ];
        tracing::info!(session_id, "invoke: prompt {}", query);

        let tools = self.tools.to_openai_functions();

        for iteration in 1..=self.config.max_iterations {
            tracing::debug!("Iteration {}/{}", iteration, self.config.max_iterations);

            let raw_response = self
                .provider
                .send_message_with_tools(messages.clone(), tools.clone())
                .await?;

            let message = raw_response
                .get("choices")
                .and_then(|v| v.get(0))
                .and_then(|v| v.get("message"))
                .cloned()
                .unwrap_or(Value::Null);

            let content = message
                .get("content")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();

            let has_tool_calls = message
                .get("tool_calls")
                .and_then(|v| v.as_array())
                .map(|calls| !calls.is_empty())
                .unwrap_or(false);

            if has_tool_calls {
                messages.push(Message::assistant(if content.is_empty() {
                    "I'll use the image generator for that.".to_string()
                } else {
                    content
                }));

                match parser::parse_openai_tool_calls(&message) {
                    Ok(calls) => {
                        tracing::info!("LLM requested {} tool(s)", calls.len());
                        for call in &calls {
                            let result = self.execute_tool_call(call, session_id).await?;
                            messages.push(Message::user(result.to_prompt_text(&call.name)));
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Unreadable tool call: {}", e);
                        messages.push(Message::user(format!("{}. Call the tool again.", e)));
                    }
                }
                continue;
            }

            tracing::debug!("invoke: response {}", content);

            match parser::parse_image_result(&content) {
                Ok(result) => {
                    tracing::info!(session_id, "Image '{}' at {}", result.name, result.path);
                    return Ok(result);
                }
                Err(e) if iteration < self.config.max_iterations => {
                    tracing::warn!("Final answer was not an image record: {}", e);
                    messages.push(Message::assistant(content));
                    messages.push(Message::user(JSON_REMINDER));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!("Max iterations ({}) exceeded", self.config.max_iterations);
        Err(AgentRuntimeError::MaxIterationsExceeded(
            self.config.max_iterations,
        ))
    }

    /// Streaming is not available for this agent
    pub async fn stream(&self, _query: &str) -> Result<ImageResult> {
        Err(AgentRuntimeError::unsupported(
            "Streaming is not supported by the image agent",
        ))
    }

    /// Execute one tool call, filling in the session id when the model left it out
    ///
    /// Parameter and lookup errors go back to the model as a failed result so
    /// it can correct itself; other tool errors end the request.
    async fn execute_tool_call(
        &self,
        call: &parser::ToolCall,
        session_id: &str,
    ) -> Result<ToolResult> {
        let mut params = call.parameters.clone();

        let takes_session = self
            .tools
            .get_tool(&call.name)
            .and_then(|tool| tool.parameters_schema().properties)
            .map(|props| props.get("session_id").is_some())
            .unwrap_or(false);

        if takes_session {
            if let Some(obj) = params.as_object_mut() {
                let missing = obj
                    .get("session_id")
                    .and_then(|v| v.as_str())
                    .map(str::is_empty)
                    .unwrap_or(true);
                if missing {
                    obj.insert("session_id".to_string(), Value::from(session_id));
                }
            }
        }

        match self.tools.execute(&call.name, params).await {
            Ok(result) => Ok(result),
            Err(e @ (ToolError::InvalidParameters(_) | ToolError::NotFound(_))) => {
                Ok(ToolResult::error(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Builder for constructing an [`ImageAgent`]
pub struct ImageAgentBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tools: Option<ToolRegistry>,
    config: AgentConfig,
}

impl ImageAgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: None,
            config: AgentConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider<P: LLMProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set an already type-erased provider, e.g. from `create_provider`
    pub fn provider_dyn(mut self, provider: Box<dyn LLMProvider>) -> Self {
        self.provider = Some(Arc::from(provider));
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<ImageAgent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentRuntimeError::config("LLM provider not set"))?;

        if self.config.max_iterations == 0 {
            return Err(AgentRuntimeError::config("max_iterations must be at least 1"));
        }

        Ok(ImageAgent {
            provider,
            tools: self.tools.unwrap_or_default(),
            config: self.config,
        })
    }
}

impl Default for ImageAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
