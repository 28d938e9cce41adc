//! LLM Provider Abstraction
//!
//! A small interface over chat-completion APIs. The agent only needs
//! OpenAI-compatible endpoints: OpenAI itself, or a local Ollama server.
//!
//! # Example
//!
//! ```no_run
//! use imagegen_llm::{create_provider, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider("ollama", "gemma3:4b", "http://127.0.0.1:11434/v1", None)?;
//!     let response = provider.send_message(vec![Message::user("Hello!")]).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod openai;
pub mod provider;
pub mod types;

// Re-exports
pub use error::{LLMError, Result};
pub use openai::OpenAIProvider;
pub use provider::LLMProvider;
pub use types::{Message, MessageRole, Response, TokenUsage};

use imagegen_core::config::AgentSettings;

/// Create a provider from configuration
///
/// `"ollama"` talks to an OpenAI-compatible endpoint without credentials;
/// `"openai"` requires an API key.
pub fn create_provider(
    provider_name: &str,
    model: &str,
    base_url: &str,
    api_key: Option<&str>,
) -> Result<Box<dyn LLMProvider>> {
    Ok(Box::new(build_openai_compatible(
        provider_name,
        model,
        base_url,
        api_key,
    )?))
}

/// Create the provider described by the `[agent]` config section
pub fn provider_from_settings(settings: &AgentSettings) -> Result<Box<dyn LLMProvider>> {
    let provider = build_openai_compatible(
        &settings.provider,
        &settings.model,
        &settings.base_url,
        settings.api_key.as_deref(),
    )?
    .with_temperature(settings.temperature);
    Ok(Box::new(provider))
}

fn build_openai_compatible(
    provider_name: &str,
    model: &str,
    base_url: &str,
    api_key: Option<&str>,
) -> Result<OpenAIProvider> {
    match provider_name.to_lowercase().as_str() {
        "ollama" => Ok(OpenAIProvider::new(model)
            .with_base_url(base_url)
            .with_name("ollama")),
        "openai" => {
            let key = api_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| LLMError::config_error("OpenAI API key cannot be empty"))?;
            Ok(OpenAIProvider::new(model)
                .with_base_url(base_url)
                .with_api_key(key))
        }
        _ => Err(LLMError::UnsupportedProvider(provider_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_ollama() {
        let provider = create_provider("ollama", "gemma3:4b", "http://127.0.0.1:11434/v1", None)
            .unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "gemma3:4b");
    }

    #[test]
    fn test_create_provider_openai_requires_key() {
        let result = create_provider("openai", "gpt-4o", "https://api.openai.com/v1", None);
        assert!(matches!(result, Err(LLMError::ConfigError(_))));

        let result = create_provider("OpenAI", "gpt-4o", "https://api.openai.com/v1", Some("sk"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_provider_from_default_settings() {
        let settings = AgentSettings::default();
        let provider = provider_from_settings(&settings).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "gemma3:4b");
    }

    #[test]
    fn test_create_provider_unknown() {
        let result = create_provider("unknown", "model", "http://localhost", None);
        match result {
            Err(LLMError::UnsupportedProvider(name)) => assert_eq!(name, "unknown"),
            _ => panic!("expected UnsupportedProvider"),
        }
    }
}
