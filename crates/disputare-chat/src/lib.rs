//! Conversation engine for Disputare.
//!
//! Provides the completion gateway (safety filter plus one remote call per
//! turn), the conversation controller that owns the transcript, per-session
//! state, and escape-by-default rendering of assistant text.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod render;
pub mod session;
pub mod transport;

pub use controller::{ConversationController, SubmitOutcome};
pub use error::ChatError;
pub use gateway::{CompletionGateway, FALLBACK_MESSAGE, MISSING_CREDENTIAL_MESSAGE};
pub use render::Line;
pub use session::{DisclaimerState, SessionClock, SessionState};
pub use transport::{
    ApiKey, ChatMessage, CompletionRequest, CompletionResponse, CompletionTransport,
    HttpTransport, MockTransport,
};
