use imagegen_core::GenerationConfig;
use std::path::PathBuf;
use std::sync::Arc;

use super::transport::{HttpImageTransport, ImageTransport};
use super::types::{target_path, GenerationOutcome, ImageRequest};
use crate::GenerationError;

/// Generates images and stores them under the configured save directory
#[derive(Clone)]
pub struct ImageGenerator {
    config: GenerationConfig,
    transport: Arc<dyn ImageTransport>,
}

impl ImageGenerator {
    pub fn new<T: ImageTransport + 'static>(config: GenerationConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    /// Generator backed by the reqwest transport
    pub fn with_http(config: GenerationConfig) -> Self {
        Self::new(config, HttpImageTransport::new())
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Path an image with this name is written to
    pub fn target_path(&self, image_name: &str) -> PathBuf {
        target_path(&self.config.save_directory, image_name)
    }

    /// Generate one image
    ///
    /// In simulated mode the endpoint is never called and nothing is
    /// written; the computed path is still reported. In production mode a
    /// 200 response body is written to the target path, replacing any file
    /// already there.
    pub async fn generate(
        &self,
        request: &ImageRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        request.validate()?;

        tracing::debug!("ImageTool prompt {}", request.prompt);
        tracing::debug!("ImageTool session_id {}", request.session_id);
        tracing::debug!("ImageTool image_name {}", request.image_name);

        let path = self.target_path(&request.image_name);

        if !self.config.mode.is_production() {
            tracing::info!(
                "Simulated mode, skipping inference for {}",
                path.display()
            );
            return Ok(GenerationOutcome::Simulated { path });
        }

        let response = self
            .transport
            .post(&self.config.endpoint, &self.config.credential, &request.prompt)
            .await
            .map_err(|e| {
                tracing::error!(
                    transport = self.transport.name(),
                    session_id = %request.session_id,
                    "Error generating image {}: {}",
                    request.image_name,
                    e
                );
                e
            })?;

        if !response.is_ok() {
            tracing::warn!(
                session_id = %request.session_id,
                "Inference endpoint returned {} for {}, nothing saved",
                response.status,
                request.image_name
            );
            return Err(GenerationError::UnexpectedStatus {
                status: response.status,
            });
        }

        tokio::fs::write(&path, &response.body)
            .await
            .map_err(|source| {
                tracing::error!(
                    session_id = %request.session_id,
                    "Error saving image to {}: {}",
                    path.display(),
                    source
                );
                GenerationError::Io {
                    path: path.clone(),
                    source,
                }
            })?;

        tracing::info!("Saved {} bytes to {}", response.body.len(), path.display());

        Ok(GenerationOutcome::Written {
            path,
            bytes: response.body.len(),
        })
    }
}
