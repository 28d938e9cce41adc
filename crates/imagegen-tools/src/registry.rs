//! Tool registry for managing and executing tools

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

use crate::{error::ToolError, tool::Tool, Result, ToolResult};

/// Registry of the tools an agent may call
///
/// Cheap to clone; clones share the same tool set.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<DashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Fails if a tool with the same name is already registered.
    pub fn register<T: Tool + 'static>(&self, tool: T) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    /// Register an already shared tool
    pub fn register_arc(&self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();

        if self.tools.contains_key(&name) {
            return Err(ToolError::AlreadyRegistered(name));
        }

        tracing::debug!("Registered tool: {}", name);
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, params: Value) -> Result<ToolResult> {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        tracing::info!("Executing tool: {} with params: {}", name, params);

        match tool.execute(params).await {
            Ok(result) => {
                if result.success {
                    tracing::debug!("Tool {} executed successfully", name);
                } else {
                    tracing::warn!(
                        "Tool {} reported failure: {}",
                        name,
                        result.error.as_deref().unwrap_or("unknown")
                    );
                }
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Tool {} execution failed: {}", name, e);
                Err(e)
            }
        }
    }

    /// Names of all registered tools
    pub fn list_tools(&self) -> Vec<String> {
        self.tools.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// All tools formatted for OpenAI function calling
    pub fn to_openai_functions(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|entry| {
                let tool = entry.value();
                tool.parameters_schema()
                    .to_openai_function(tool.name(), tool.description())
            })
            .collect()
    }
}
