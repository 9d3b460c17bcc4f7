//! Completion gateway: safety filter first, then one remote call.
//!
//! [`CompletionGateway::respond`] always returns reply text. Missing
//! credentials, transport failures and malformed bodies are logged and turned
//! into fixed messages, so callers never see an error.

use disputare_core::config::CompletionConfig;
use disputare_core::safety::SensitiveTopicFilter;
use disputare_core::types::Depth;

use crate::error::ChatError;
use crate::transport::{ApiKey, ChatMessage, CompletionRequest, CompletionTransport};

/// Returned when no API key is configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Error: OpenAI API key is missing.";

/// Returned on any transport failure or a response without choices.
pub const FALLBACK_MESSAGE: &str = "Sorry, I couldn't generate a response. Please try again.";

/// The devil's-advocate instruction for `depth`.
pub fn system_instruction(depth: Depth) -> String {
    format!(
        "You are an AI that plays devil's advocate. Your job is to challenge the user's \
         opinion in a thoughtful way, not for the sake of arguing but to help the user learn \
         if their opinions are truly theirs. Present your responses in bullet points for \
         easier readability. Avoid harmful or dangerous content. Current depth: {depth}."
    )
}

/// Stateless front door to the completion service.
pub struct CompletionGateway<T> {
    transport: T,
    credential: Option<ApiKey>,
    filter: SensitiveTopicFilter,
    settings: CompletionConfig,
}

impl<T: CompletionTransport> CompletionGateway<T> {
    pub fn new(transport: T, credential: Option<ApiKey>, settings: CompletionConfig) -> Self {
        Self {
            transport,
            credential,
            filter: SensitiveTopicFilter::new(),
            settings,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Build the request body for `text` at `depth`.
    pub fn build_request(&self, text: &str, depth: Depth) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(system_instruction(depth)),
                ChatMessage::user(text),
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Produce the assistant reply for `text`.
    pub async fn respond(&self, text: &str, depth: Depth) -> String {
        if let Some(topic) = self.filter.matched_topic(text) {
            tracing::info!(topic, "Sensitive topic detected; returning help resources");
            return self.filter.safety_message();
        }

        match self.complete(text, depth).await {
            Ok(reply) => reply,
            Err(ChatError::MissingCredential) => {
                tracing::error!("API key is not set");
                MISSING_CREDENTIAL_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Completion failed");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    async fn complete(&self, text: &str, depth: Depth) -> Result<String, ChatError> {
        let credential = self
            .credential
            .as_ref()
            .ok_or(ChatError::MissingCredential)?;
        let request = self.build_request(text, depth);
        let response = self.transport.complete(credential, &request).await?;
        response
            .first_content()
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ChatError::MalformedResponse("no choices in response".to_string()))
    }
}
