use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::json;

use crate::GenerationError;

/// Raw answer from the inference endpoint
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Sends a prompt to a text-to-image endpoint
#[async_trait]
pub trait ImageTransport: Send + Sync {
    /// POST `{"inputs": prompt}` with `Authorization: Bearer {credential}`
    async fn post(
        &self,
        endpoint: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<TransportResponse, GenerationError>;

    fn name(&self) -> &str;
}

/// reqwest-backed transport
///
/// No timeout and no retries: a request runs until the server answers or the
/// connection fails.
#[derive(Debug, Clone, Default)]
pub struct HttpImageTransport {
    client: Client,
}

impl HttpImageTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageTransport for HttpImageTransport {
    async fn post(
        &self,
        endpoint: &str,
        credential: &str,
        prompt: &str,
    ) -> Result<TransportResponse, GenerationError> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(credential)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await
            .map_err(|e| GenerationError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        tracing::debug!("Inference endpoint responded with {}", status);

        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::transport(format!("reading response body: {}", e)))?;

        Ok(TransportResponse { status, body })
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_posts_prompt_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/sd"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_json(json!({ "inputs": "a lighthouse at dusk" })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpImageTransport::new();
        let response = transport
            .post(&format!("{}/models/sd", server.uri()), "hf_test", "a lighthouse at dusk")
            .await
            .unwrap();

        assert!(response.is_ok());
        assert_eq!(response.body.as_ref(), &[0x89, 0x50, 0x4e, 0x47]);
    }

    #[tokio::test]
    async fn test_non_200_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .mount(&server)
            .await;

        let transport = HttpImageTransport::new();
        let response = transport.post(&server.uri(), "hf_test", "x").await.unwrap();

        assert_eq!(response.status, 503);
        assert!(!response.is_ok());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let transport = HttpImageTransport::new();
        let err = transport
            .post("http://127.0.0.1:1/unreachable", "hf_test", "x")
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Transport(_)));
    }

    #[test]
    fn test_name() {
        assert_eq!(HttpImageTransport::new().name(), "http");
    }
}
