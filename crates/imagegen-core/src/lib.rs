//! Image Generator Core
//!
//! Error handling, configuration and logging setup shared by the
//! image generator tool, agent, server and client.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{
    load_config, load_config_or_default, AppConfig, GenerationConfig, RunMode,
    DEFAULT_INFERENCE_ENDPOINT,
};
pub use error::{CoreError, Result};
pub use logging::{init_logging, LogConfig};
