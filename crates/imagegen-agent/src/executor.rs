//! Request execution seam between the protocol server and the agent

use async_trait::async_trait;
use imagegen_tools::ImageResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::AgentRuntimeError, ImageAgent, Result};

/// What the server knows about an incoming request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub task_id: String,
    /// Conversation id, used as the session id for the tool
    pub context_id: String,
    /// Concatenated text parts of the user message
    pub user_input: String,
}

impl RequestContext {
    pub fn new(
        task_id: impl Into<String>,
        context_id: impl Into<String>,
        user_input: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            user_input: user_input.into(),
        }
    }
}

/// Agent answer ready to be sent back as a text message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    /// JSON rendering of `result`
    pub text: String,
    pub result: ImageResult,
}

impl AgentReply {
    pub fn from_result(result: ImageResult) -> Result<Self> {
        let text = serde_json::to_string(&result)
            .map_err(|e| AgentRuntimeError::output(e.to_string()))?;
        Ok(Self { text, result })
    }
}

/// Runs agent requests on behalf of the server
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn execute(&self, context: &RequestContext) -> Result<AgentReply>;

    async fn cancel(&self, context: &RequestContext) -> Result<()>;
}

/// [`AgentExecutor`] backed by an [`ImageAgent`]
#[derive(Clone)]
pub struct ImageAgentExecutor {
    agent: Arc<ImageAgent>,
}

impl ImageAgentExecutor {
    pub fn new(agent: ImageAgent) -> Self {
        Self {
            agent: Arc::new(agent),
        }
    }

    fn validate_request(context: &RequestContext) -> Result<()> {
        if context.user_input.trim().is_empty() {
            return Err(AgentRuntimeError::InvalidRequest(
                "message contains no text".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AgentExecutor for ImageAgentExecutor {
    async fn execute(&self, context: &RequestContext) -> Result<AgentReply> {
        Self::validate_request(context)?;

        tracing::info!(
            task_id = %context.task_id,
            context_id = %context.context_id,
            "Executing image request"
        );

        let result = self
            .agent
            .invoke(&context.user_input, &context.context_id)
            .await?;

        AgentReply::from_result(result)
    }

    async fn cancel(&self, context: &RequestContext) -> Result<()> {
        tracing::warn!(task_id = %context.task_id, "Cancel requested");
        Err(AgentRuntimeError::unsupported("cancel is not supported"))
    }
}
