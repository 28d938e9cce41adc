//! Configuration management for the image generator
//!
//! Two kinds of configuration live here:
//! - [`AppConfig`]: process settings (logging, agent model, server address)
//!   loaded from an optional file overlaid with `IMAGEGEN__*` variables
//! - [`GenerationConfig`]: what the image tool needs to run (save directory,
//!   inference credential, run mode), built once at startup from `ENV`,
//!   `SAVE_PATH` and `HF_TOKEN`

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Remote text-to-image endpoint
pub const DEFAULT_INFERENCE_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-3.5-large";

/// Environment variable holding the run-mode discriminator
pub const ENV_MODE: &str = "ENV";
/// Environment variable holding the save directory
pub const ENV_SAVE_PATH: &str = "SAVE_PATH";
/// Environment variable holding the inference bearer token
pub const ENV_TOKEN: &str = "HF_TOKEN";

/// Main process configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Agent/LLM settings
    #[serde(default)]
    pub agent: AgentSettings,

    /// Server settings
    #[serde(default)]
    pub server: ServerSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format
    #[serde(default)]
    pub json: bool,
}

/// Agent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Agent display name
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Provider kind ("ollama" or "openai")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible chat API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key for the chat API (not needed for Ollama)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum iterations of the tool-calling loop
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_agent_name() -> String {
    "Image Generator Agent".to_string()
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "gemma3:4b".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:11434/v1".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_iterations() -> usize {
    3
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    10001
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            temperature: default_temperature(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Load configuration from a file
///
/// Supports TOML, JSON, and YAML formats based on file extension.
/// Values can be overridden with `IMAGEGEN__SECTION__KEY` variables.
///
/// # Example
///
/// ```no_run
/// use imagegen_core::config::load_config;
///
/// let config = load_config("imagegen.toml").unwrap();
/// println!("Model: {}", config.agent.model);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CoreError::config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("IMAGEGEN").separator("__"))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;

    tracing::info!("Configuration loaded from {}", path.display());

    Ok(config)
}

/// Load configuration with defaults if the file doesn't exist
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> AppConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

/// Whether the image tool talks to the real inference service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Call the remote endpoint and write the image
    Production,
    /// Skip the call and the write; only report the target path
    Simulated,
}

impl RunMode {
    /// Parse the `ENV` discriminator. Only the exact literal `"prod"` enables
    /// production mode.
    pub fn from_discriminator(value: &str) -> Self {
        if value == "prod" {
            Self::Production
        } else {
            Self::Simulated
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Configuration for the image generation tool
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Directory images are written into
    pub save_directory: PathBuf,
    /// Bearer credential for the inference endpoint
    #[serde(skip_serializing)]
    pub credential: String,
    /// Production or simulated
    pub mode: RunMode,
    /// Inference endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_INFERENCE_ENDPOINT.to_string()
}

impl GenerationConfig {
    /// Create a configuration targeting the default inference endpoint
    pub fn new(save_directory: impl Into<PathBuf>, credential: impl Into<String>, mode: RunMode) -> Self {
        Self {
            save_directory: save_directory.into(),
            credential: credential.into(),
            mode,
            endpoint: default_endpoint(),
        }
    }

    /// Override the inference endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build from the process environment
    ///
    /// A `.env` file in the working directory is loaded first when present.
    /// `ENV`, `SAVE_PATH` and `HF_TOKEN` are all required; the first missing
    /// one is reported.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).ok_or_else(|| {
                CoreError::config(format!("environment variable {} is not set", key))
            })
        };

        let mode = RunMode::from_discriminator(&require(ENV_MODE)?);
        let save_directory = PathBuf::from(require(ENV_SAVE_PATH)?);
        let credential = require(ENV_TOKEN)?;

        tracing::info!(
            "Image generation configured: mode={:?}, save_directory={}",
            mode,
            save_directory.display()
        );

        Ok(Self::new(save_directory, credential, mode))
    }
}

// Hand-written so the credential never reaches the logs
impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("save_directory", &self.save_directory)
            .field("credential", &"***")
            .field("mode", &self.mode)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
