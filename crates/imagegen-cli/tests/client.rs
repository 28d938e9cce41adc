//! Client tests against a mocked A2A server

use futures::StreamExt;
use imagegen_cli::{extract_image_result, A2AClient, ClientError, StreamEvent};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(envelopes: &[serde_json::Value]) -> String {
    envelopes
        .iter()
        .map(|e| format!("data: {}\n\n", e))
        .collect()
}

#[tokio::test]
async fn test_agent_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/agent.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Image Generator Agent",
            "description": "Generate images",
            "url": "http://localhost:10001/",
            "version": "1.0.0",
            "defaultInputModes": ["text", "text/plain"],
            "defaultOutputModes": ["text", "text/plain"],
            "capabilities": { "streaming": true },
            "skills": []
        })))
        .mount(&server)
        .await;

    let card = A2AClient::new(server.uri()).agent_card().await.unwrap();
    assert_eq!(card.name, "Image Generator Agent");
    assert_eq!(card.default_output_modes, vec!["text", "text/plain"]);
}

#[tokio::test]
async fn test_streaming_message() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        json!({
            "jsonrpc": "2.0", "id": "1",
            "result": { "kind": "status-update", "final": false, "status": { "state": "working" } }
        }),
        json!({
            "jsonrpc": "2.0", "id": "1",
            "result": {
                "kind": "message", "role": "agent",
                "parts": [{ "kind": "text", "text": "```json\n{\"name\":\"Whiskers\",\"description\":\"A cute cat\",\"path\":\"/tmp/whiskers.png\"}\n```" }]
            }
        }),
    ]);

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({
            "method": "message/stream",
            "params": { "configuration": { "acceptedOutputModes": ["text"] } }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = A2AClient::new(server.uri());
    let events: Vec<_> = client
        .send_message_streaming("Generate an image of a cute cat.")
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], Ok(StreamEvent::Status { state, .. }) if state == "working"));

    match &events[1] {
        Ok(StreamEvent::Message { text }) => {
            let image = extract_image_result(text).unwrap();
            assert_eq!(image.name, "Whiskers");
            assert_eq!(image.path, "/tmp/whiskers.png");
        }
        other => panic!("expected message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_json_error_instead_of_stream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": "1",
            "error": { "code": -32602, "message": "missing field `parts`" }
        })))
        .mount(&server)
        .await;

    let events: Vec<_> = A2AClient::new(server.uri())
        .send_message_streaming("x")
        .await
        .unwrap()
        .collect()
        .await;

    assert!(matches!(
        events.as_slice(),
        [Err(ClientError::Rpc { code: -32602, .. })]
    ));
}

#[tokio::test]
async fn test_server_down_is_transport_error() {
    let client = A2AClient::new("http://127.0.0.1:1");
    assert!(matches!(
        client.agent_card().await,
        Err(ClientError::Transport(_))
    ));
}
