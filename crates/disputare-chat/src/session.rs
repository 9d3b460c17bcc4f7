//! Per-session state: the elapsed-time clock and the disclaimer flag.
//!
//! Created when a session starts and dropped when it ends. The clock is for
//! display only and never influences the conversation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Disclaimer shown once at session start.
pub const DISCLAIMER_LINES: &[&str] = &[
    "Disputare is designed for intellectual discourse and is not a substitute for professional advice.",
    "The AI's responses are generated based on patterns in data and may not always be accurate or appropriate.",
    "For sensitive topics or personal issues, please seek help from qualified professionals.",
    "We prioritize user safety and have implemented filters for potentially harmful content.",
    "Your privacy is important. Do not share personal or sensitive information.",
    "The opinions expressed by the AI do not necessarily reflect the views of the creators.",
    "Use this platform responsibly and respectfully.",
];

/// Render elapsed seconds as `MM:SS`. Minutes keep counting past 99.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Seconds since session start, advanced once per second by a background task.
pub struct SessionClock {
    elapsed: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
}

impl SessionClock {
    /// Start ticking. Must be called inside a tokio runtime.
    pub fn start() -> Self {
        let elapsed = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&elapsed);
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(1));
            // First tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });
        Self {
            elapsed,
            ticker: Some(ticker),
        }
    }

    /// A clock with no background task; advance it with [`SessionClock::tick`].
    pub fn manual() -> Self {
        Self {
            elapsed: Arc::new(AtomicU64::new(0)),
            ticker: None,
        }
    }

    pub fn tick(&self) {
        self.elapsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed_secs())
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

/// Whether the user has acknowledged the disclaimer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisclaimerState {
    #[default]
    Pending,
    Acknowledged,
}

/// Everything the hosting process tracks for one session besides the
/// conversation itself.
pub struct SessionState {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    disclaimer: DisclaimerState,
    clock: SessionClock,
}

impl SessionState {
    pub fn new(clock: SessionClock) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, "Session started");
        Self {
            id,
            started_at: Utc::now(),
            disclaimer: DisclaimerState::Pending,
            clock,
        }
    }

    /// Start a session with a live clock.
    pub fn start() -> Self {
        Self::new(SessionClock::start())
    }

    pub fn disclaimer(&self) -> DisclaimerState {
        self.disclaimer
    }

    pub fn needs_disclaimer(&self) -> bool {
        self.disclaimer == DisclaimerState::Pending
    }

    pub fn acknowledge(&mut self) {
        if self.disclaimer == DisclaimerState::Pending {
            tracing::debug!(session_id = %self.id, "Disclaimer acknowledged");
        }
        self.disclaimer = DisclaimerState::Acknowledged;
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn elapsed(&self) -> String {
        self.clock.formatted()
    }
}

impl Drop for SessionState {
    fn drop(&mut self) {
        tracing::info!(
            session_id = %self.id,
            elapsed_secs = self.clock.elapsed_secs(),
            "Session ended"
        );
    }
}
