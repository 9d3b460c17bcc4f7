//! Conversation controller: owns the transcript, the depth, and the
//! generation status.
//!
//! Each submit appends a user turn, asks the gateway for a reply, and appends
//! the reply. Whether a submit may start while another is pending is decided
//! by [`OverlapPolicy`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use disputare_core::types::{Depth, GenerationStatus, OverlapPolicy, Turn};

use crate::gateway::CompletionGateway;
use crate::transport::CompletionTransport;

/// Result of a call to [`ConversationController::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing changed.
    Ignored,
    /// A reply was already pending and the policy is `Reject`.
    Rejected,
    /// Both turns were appended; carries the assistant turn.
    Replied(Turn),
}

#[derive(Debug, Default)]
struct ConversationState {
    transcript: Vec<Turn>,
    depth: Depth,
}

/// Decrements the in-flight counter when the gateway call is finished.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ConversationController<T> {
    gateway: CompletionGateway<T>,
    state: Mutex<ConversationState>,
    in_flight: AtomicUsize,
    policy: OverlapPolicy,
}

impl<T: CompletionTransport> ConversationController<T> {
    pub fn new(gateway: CompletionGateway<T>, depth: Depth, policy: OverlapPolicy) -> Self {
        Self {
            gateway,
            state: Mutex::new(ConversationState {
                transcript: Vec::new(),
                depth,
            }),
            in_flight: AtomicUsize::new(0),
            policy,
        }
    }

    pub fn gateway(&self) -> &CompletionGateway<T> {
        &self.gateway
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Submit one user input and wait for the reply.
    ///
    /// Blank input is ignored without touching the transcript or the status.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Some(_guard) = self.begin_generation() else {
            tracing::debug!("Submit rejected: a reply is already pending");
            return SubmitOutcome::Rejected;
        };

        let depth = {
            let mut state = self.lock();
            state.transcript.push(Turn::user(text));
            tracing::debug!(depth = %state.depth, turns = state.transcript.len(), "User turn appended");
            state.depth
        };

        let reply = self.gateway.respond(text, depth).await;
        let turn = Turn::assistant(reply);

        {
            let mut state = self.lock();
            state.transcript.push(turn.clone());
            tracing::debug!(turns = state.transcript.len(), "Assistant turn appended");
        }

        SubmitOutcome::Replied(turn)
    }

    /// Replace the depth. Applies to the next gateway call only.
    pub fn set_depth(&self, depth: Depth) {
        let mut state = self.lock();
        if state.depth != depth {
            tracing::info!(from = %state.depth, to = %depth, "Depth changed");
        }
        state.depth = depth;
    }

    pub fn depth(&self) -> Depth {
        self.lock().depth
    }

    pub fn status(&self) -> GenerationStatus {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            GenerationStatus::Pending
        } else {
            GenerationStatus::Idle
        }
    }

    pub fn is_generating(&self) -> bool {
        self.status() == GenerationStatus::Pending
    }

    /// Snapshot of the transcript in display order.
    pub fn transcript(&self) -> Vec<Turn> {
        self.lock().transcript.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin_generation(&self) -> Option<InFlightGuard<'_>> {
        match self.policy {
            OverlapPolicy::Reject => self
                .in_flight
                .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
                .ok()?,
            OverlapPolicy::Allow => self.in_flight.fetch_add(1, Ordering::SeqCst),
        };
        Some(InFlightGuard(&self.in_flight))
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
