//! Wire types and transports for the chat-completions endpoint.
//!
//! [`HttpTransport`] performs the real POST with `reqwest`. [`MockTransport`]
//! returns scripted responses and records every request, for tests and for
//! offline runs.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

// =============================================================================
// Wire types
// =============================================================================

/// An API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for one completion.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Content of the system message, if any.
    pub fn system_instruction(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
    }
}

/// Response body. A body without `choices` decodes as having none.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ChoiceMessage {
    pub content: String,
}

impl CompletionResponse {
    /// A response with a single choice carrying `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ChoiceMessage {
                    content: content.into(),
                },
            }],
        }
    }

    /// Content of the first choice.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

// =============================================================================
// Transport trait
// =============================================================================

/// Sends one completion request and returns the decoded response.
///
/// Implementations must not retry; one call is one round trip.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(
        &self,
        credential: &ApiKey,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ChatError>;
}

#[async_trait]
impl<T: CompletionTransport + ?Sized> CompletionTransport for Arc<T> {
    async fn complete(
        &self,
        credential: &ApiKey,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ChatError> {
        (**self).complete(credential, request).await
    }
}

// =============================================================================
// HTTP transport
// =============================================================================

/// `reqwest`-backed transport posting JSON to a chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn complete(
        &self,
        credential: &ApiKey,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ChatError> {
        tracing::debug!(endpoint = %self.endpoint, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let decoded: CompletionResponse = serde_json::from_slice(&body)?;
        tracing::debug!(choices = decoded.choices.len(), "Completion response decoded");
        Ok(decoded)
    }
}

// =============================================================================
// Mock transport
// =============================================================================

/// Scripted transport.
///
/// Each call pops the next scripted result (after its optional delay). When
/// the script is empty every call returns the default reply.
pub struct MockTransport {
    script: Mutex<VecDeque<(Duration, Result<CompletionResponse, ChatError>)>>,
    default_reply: String,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_default_reply("Mock reply: have you considered the opposite view?")
    }

    pub fn with_default_reply(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_reply: reply.into(),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a single-choice reply.
    pub fn push_reply(&self, content: impl Into<String>) -> &Self {
        self.push_after(
            Duration::ZERO,
            Ok(CompletionResponse::with_content(content)),
        )
    }

    /// Queue a single-choice reply that resolves after `delay`.
    pub fn push_reply_after(&self, delay: Duration, content: impl Into<String>) -> &Self {
        self.push_after(delay, Ok(CompletionResponse::with_content(content)))
    }

    /// Queue an arbitrary response body.
    pub fn push_response(&self, response: CompletionResponse) -> &Self {
        self.push_after(Duration::ZERO, Ok(response))
    }

    /// Queue a failure.
    pub fn push_error(&self, error: ChatError) -> &Self {
        self.push_after(Duration::ZERO, Err(error))
    }

    fn push_after(
        &self,
        delay: Duration,
        result: Result<CompletionResponse, ChatError>,
    ) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back((delay, result));
        self
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl CompletionTransport for MockTransport {
    async fn complete(
        &self,
        _credential: &ApiKey,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match next {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(CompletionResponse::with_content(self.default_reply.clone())),
        }
    }
}
