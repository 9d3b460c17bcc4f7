//! End-to-end tests for the HTTP completion path.
//!
//! A local axum server stands in for the chat-completions endpoint. Each test
//! starts its own server and records what the client sent.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use disputare_chat::{
    ApiKey, CompletionGateway, ConversationController, HttpTransport, SubmitOutcome,
    FALLBACK_MESSAGE,
};
use disputare_core::config::CompletionConfig;
use disputare_core::types::{Depth, OverlapPolicy, Sender};

// =============================================================================
// Helpers
// =============================================================================

const TEST_KEY: &str = "sk-test-12345";

#[derive(Clone)]
enum Canned {
    Json(Value),
    Status(StatusCode),
    Raw(&'static str),
}

#[derive(Clone, Debug)]
struct Seen {
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct ServerState {
    canned: Canned,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn completions(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen.lock().unwrap().push(Seen {
        authorization,
        body,
    });

    match state.canned {
        Canned::Json(value) => Json(value).into_response(),
        Canned::Status(code) => (code, "upstream exploded").into_response(),
        Canned::Raw(text) => (StatusCode::OK, text).into_response(),
    }
}

/// Start a server answering every request with `canned`.
async fn start_server(canned: Canned) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        canned,
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1/chat/completions", addr), seen)
}

fn gateway(endpoint: &str) -> CompletionGateway<HttpTransport> {
    CompletionGateway::new(
        HttpTransport::new(endpoint),
        Some(ApiKey::new(TEST_KEY)),
        CompletionConfig::default(),
    )
}

fn reply_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

// =============================================================================
// Gateway over HTTP
// =============================================================================

#[tokio::test]
async fn test_request_carries_bearer_and_body() {
    let (endpoint, seen) = start_server(Canned::Json(reply_body(" Hello "))).await;
    let gw = gateway(&endpoint);

    let reply = gw.respond("Remote work is overrated", Depth::Thoughtful).await;
    assert_eq!(reply, "Hello");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some("Bearer sk-test-12345")
    );

    let body = &seen[0].body;
    assert_eq!(body["model"], "gpt-3.5-turbo");
    assert_eq!(body["max_tokens"], 250);
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][0]["content"]
        .as_str()
        .unwrap()
        .ends_with("Current depth: Thoughtful."));
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "Remote work is overrated");
}

#[tokio::test]
async fn test_empty_choices_fall_back() {
    let (endpoint, _seen) = start_server(Canned::Json(json!({ "choices": [] }))).await;
    assert_eq!(gateway(&endpoint).respond("x", Depth::Casual).await, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_error_body_without_choices_falls_back() {
    let (endpoint, _seen) = start_server(Canned::Json(
        json!({ "error": { "message": "invalid api key" } }),
    ))
    .await;
    assert_eq!(gateway(&endpoint).respond("x", Depth::Casual).await, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_server_error_status_falls_back() {
    let (endpoint, seen) = start_server(Canned::Status(StatusCode::INTERNAL_SERVER_ERROR)).await;
    assert_eq!(gateway(&endpoint).respond("x", Depth::Casual).await, FALLBACK_MESSAGE);
    // One attempt only.
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_json_body_falls_back() {
    let (endpoint, _seen) = start_server(Canned::Raw("<html>bad gateway</html>")).await;
    assert_eq!(gateway(&endpoint).respond("x", Depth::Casual).await, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = format!("http://{}/v1/chat/completions", addr);
    assert_eq!(gateway(&endpoint).respond("x", Depth::Casual).await, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_sensitive_topic_never_reaches_server() {
    let (endpoint, seen) = start_server(Canned::Json(reply_body("should not be used"))).await;
    let reply = gateway(&endpoint)
        .respond("Is an eating disorder a lifestyle?", Depth::Deep)
        .await;
    assert!(reply.contains("Crisis Text Line: HOME to 741741"));
    assert!(seen.lock().unwrap().is_empty());
}

// =============================================================================
// Controller over HTTP
// =============================================================================

#[tokio::test]
async fn test_conversation_over_http() {
    let (endpoint, seen) =
        start_server(Canned::Json(reply_body("\u{2022} Who benefits?\n"))).await;
    let controller =
        ConversationController::new(gateway(&endpoint), Depth::Casual, OverlapPolicy::Reject);

    controller.submit("Taxes are theft").await;
    controller.set_depth(Depth::Socratic);
    let outcome = controller.submit("Fine, some taxes").await;

    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(
        transcript.iter().map(|t| t.sender).collect::<Vec<_>>(),
        vec![Sender::User, Sender::Assistant, Sender::User, Sender::Assistant]
    );
    assert_eq!(transcript[3].text, "\u{2022} Who benefits?");
    assert_eq!(outcome, SubmitOutcome::Replied(transcript[3].clone()));

    let seen = seen.lock().unwrap();
    let instruction = |i: usize| {
        seen[i].body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .to_string()
    };
    assert!(instruction(0).contains("Current depth: Casual."));
    assert!(instruction(1).contains("Current depth: Socratic."));
}
