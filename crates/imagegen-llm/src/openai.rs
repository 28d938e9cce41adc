//! OpenAI-compatible chat completions provider
//!
//! Works against api.openai.com and against any server exposing the same
//! `/chat/completions` route (Ollama serves it under `/v1`).

use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    error::{LLMError, Result},
    provider::LLMProvider,
    types::{Message, MessageRole, Response, TokenUsage},
};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI-compatible API provider
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    name: String,
    temperature: Option<f32>,
    timeout: Duration,
    max_retry_elapsed: Duration,
}

impl OpenAIProvider {
    /// Create a provider for `model` against api.openai.com
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: OPENAI_API_BASE.to_string(),
            api_key: None,
            model: model.into(),
            name: "openai".to_string(),
            temperature: None,
            timeout: Duration::from_secs(120),
            max_retry_elapsed: Duration::from_secs(30),
        }
    }

    /// Point at another OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Name reported by [`LLMProvider::name`]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upper bound on time spent retrying transient failures
    pub fn with_max_retry_elapsed(mut self, max: Duration) -> Self {
        self.max_retry_elapsed = max;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Convert our messages to OpenAI format
    fn format_messages(&self, messages: &[Message]) -> Vec<OpenAIMessage> {
        messages
            .iter()
            .map(|msg| OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system".to_string(),
                    MessageRole::User => "user".to_string(),
                    MessageRole::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect()
    }

    fn build_request(&self, messages: &[Message], tools: Option<Vec<serde_json::Value>>) -> OpenAIRequest {
        let tool_choice = tools.as_ref().map(|_| "auto".to_string());
        OpenAIRequest {
            model: self.model.clone(),
            messages: self.format_messages(messages),
            stream: false,
            temperature: self.temperature,
            tools,
            tool_choice,
        }
    }

    /// Make a retryable API request
    ///
    /// 429 and 5xx responses and connection failures are retried with
    /// exponential backoff; other 4xx responses and timeouts are not.
    async fn make_request<T: for<'de> Deserialize<'de>>(
        &self,
        request_body: &OpenAIRequest,
    ) -> Result<T> {
        let url = self.completions_url();

        let operation = || async {
            let mut request = self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .timeout(self.timeout)
                .json(request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    backoff::Error::Permanent(LLMError::Timeout)
                } else {
                    backoff::Error::Transient {
                        err: LLMError::HttpError(e),
                        retry_after: None,
                    }
                }
            })?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs: Option<u64> = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());

                return Err(backoff::Error::Transient {
                    err: LLMError::RateLimitExceeded(retry_after_secs),
                    retry_after: retry_after_secs.map(Duration::from_secs),
                });
            }

            if status.is_server_error() {
                let error_text = response.text().await.unwrap_or_default();
                tracing::warn!("{} server error ({}), retrying", self.name, status);
                return Err(backoff::Error::Transient {
                    err: LLMError::api_error(format!("Server error: {}", error_text)),
                    retry_after: None,
                });
            }

            if status.is_client_error() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(backoff::Error::Permanent(LLMError::api_error(format!(
                    "Client error ({}): {}",
                    status, error_text
                ))));
            }

            response
                .json::<T>()
                .await
                .map_err(|e| backoff::Error::Permanent(LLMError::parse_error(e.to_string())))
        };

        let backoff_config = ExponentialBackoff {
            max_elapsed_time: Some(self.max_retry_elapsed),
            ..Default::default()
        };

        retry(backoff_config, operation).await
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn send_message_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let tools = if tools.is_empty() { None } else { Some(tools) };
        let request = self.build_request(&messages, tools);
        tracing::debug!("Sending {} messages to {}", messages.len(), self.model);

        self.make_request(&request).await
    }

    async fn send_message(&self, messages: Vec<Message>) -> Result<Response> {
        let request = self.build_request(&messages, None);
        let response: OpenAIResponse = self.make_request(&request).await?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LLMError::parse_error("No choices in response"))?;

        Ok(Response {
            content: choice.message.content.clone().unwrap_or_default(),
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.clone(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "model": "gemma3:4b",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        })
    }

    #[test]
    fn test_provider_defaults() {
        let provider = OpenAIProvider::new("gpt-4o");
        assert_eq!(provider.model(), "gpt-4o");
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = OpenAIProvider::new("gemma3:4b").with_base_url("http://127.0.0.1:11434/v1/");
        assert_eq!(provider.completions_url(), "http://127.0.0.1:11434/v1/chat/completions");
    }

    #[test]
    fn test_message_formatting() {
        let provider = OpenAIProvider::new("gpt-4o");
        let formatted = provider.format_messages(&[Message::system("You are an artist"), Message::user("Hi")]);
        assert_eq!(formatted.len(), 2);
        assert_eq!(formatted[0].role, "system");
        assert_eq!(formatted[1].role, "user");
    }

    #[test]
    fn test_request_includes_tool_choice_only_with_tools() {
        let provider = OpenAIProvider::new("gpt-4o").with_temperature(0.7);

        let plain = serde_json::to_value(provider.build_request(&[Message::user("Hi")], None)).unwrap();
        assert!(plain.get("tools").is_none());
        assert!(plain.get("tool_choice").is_none());
        assert!((plain["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);

        let with_tools = serde_json::to_value(
            provider.build_request(&[Message::user("Hi")], Some(vec![json!({"type": "function"})])),
        )
        .unwrap();
        assert_eq!(with_tools["tool_choice"], "auto");
    }

    #[tokio::test]
    async fn test_send_message_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gemma3:4b", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("A sunny meadow")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("gemma3:4b")
            .with_base_url(format!("{}/v1", server.uri()))
            .with_api_key("sk-test");

        let response = provider.send_message(vec![Message::user("Describe")]).await.unwrap();
        assert_eq!(response.content, "A sunny meadow");
        assert_eq!(response.usage.unwrap().total_tokens, 15);
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("recovered")))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("gemma3:4b").with_base_url(server.uri());
        let response = provider.send_message(vec![Message::user("Hi")]).await.unwrap();
        assert_eq!(response.content, "recovered");
    }

    #[tokio::test]
    async fn test_client_error_is_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad model"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("nope").with_base_url(server.uri());
        let err = provider.send_message(vec![Message::user("Hi")]).await.unwrap_err();

        assert!(matches!(err, LLMError::ApiError(_)));
        assert!(err.to_string().contains("bad model"));
    }

    #[tokio::test]
    async fn test_send_with_tools_returns_raw_json() {
        let server = MockServer::start().await;
        let raw = json!({
            "model": "gemma3:4b",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "image_generator", "arguments": "{}" }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"tool_choice": "auto"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(raw.clone()))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("gemma3:4b").with_base_url(server.uri());
        let value = provider
            .send_message_with_tools(vec![Message::user("Draw")], vec![json!({"type": "function"})])
            .await
            .unwrap();

        assert_eq!(value, raw);
    }
}
