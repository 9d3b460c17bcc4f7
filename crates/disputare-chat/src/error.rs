//! Error types for the completion path.
//!
//! None of these reach the controller: the gateway logs them and answers with
//! a fixed message instead.

/// Errors from talking to the completion service.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::MalformedResponse(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::MalformedResponse(err.to_string())
    }
}
