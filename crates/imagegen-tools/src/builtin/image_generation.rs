//! Image generation exposed as an agent tool

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    GenerationError, ImageGenerator, ImageRequest, Result, Tool, ToolError, ToolResult,
    ToolSchema,
};

/// Tool name as seen by the model
pub const IMAGE_TOOL_NAME: &str = "image_generator";

/// Wraps an [`ImageGenerator`] so the agent can call it
///
/// Empty `prompt`/`image_name` and malformed parameters are returned as
/// `Err(ToolError::InvalidParameters)`. Everything that goes wrong after
/// validation comes back as a failed [`ToolResult`] tagged with the
/// [`GenerationError::kind`].
#[derive(Clone)]
pub struct ImageGenerationTool {
    generator: Arc<ImageGenerator>,
}

impl ImageGenerationTool {
    pub fn new(generator: ImageGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    pub fn generator(&self) -> &ImageGenerator {
        &self.generator
    }
}

#[async_trait]
impl Tool for ImageGenerationTool {
    fn name(&self) -> &str {
        IMAGE_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Image generation tool that generates images based on a prompt."
    }

    fn parameters_schema(&self) -> ToolSchema {
        ToolSchema::from_type::<ImageRequest>()
            .with_description("Input schema for the image generation tool")
    }

    async fn execute(&self, params: Value) -> Result<ToolResult> {
        let request: ImageRequest = serde_json::from_value(params)
            .map_err(|e| ToolError::invalid_params(e.to_string()))?;

        match self.generator.generate(&request).await {
            Ok(outcome) => Ok(ToolResult::success(json!({
                "path": outcome.path().display().to_string(),
                "written": outcome.was_written(),
            }))),
            Err(GenerationError::InvalidArgument(msg)) => Err(ToolError::invalid_params(msg)),
            Err(e) => Ok(ToolResult::failure(e.kind(), e.to_string())),
        }
    }
}
