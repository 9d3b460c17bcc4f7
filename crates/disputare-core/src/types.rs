use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DisputareError;

// =============================================================================
// Enums
// =============================================================================

/// Who authored a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// How hard the assistant pushes back.
///
/// Only changes the instruction text sent to the model; control flow is the
/// same at every depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    #[default]
    Casual,
    Thoughtful,
    Deep,
    Socratic,
}

impl Depth {
    /// All depths in menu order.
    pub const ALL: [Depth; 4] = [
        Depth::Casual,
        Depth::Thoughtful,
        Depth::Deep,
        Depth::Socratic,
    ];

    /// The display label, as it appears in the model instruction.
    pub fn label(&self) -> &'static str {
        match self {
            Depth::Casual => "Casual",
            Depth::Thoughtful => "Thoughtful",
            Depth::Deep => "Deep",
            Depth::Socratic => "Socratic",
        }
    }

    /// Icon shown next to assistant turns.
    pub fn icon(&self) -> DepthIcon {
        match self {
            Depth::Casual => DepthIcon::Lightbulb,
            Depth::Thoughtful => DepthIcon::Book,
            Depth::Deep | Depth::Socratic => DepthIcon::Brain,
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Depth {
    type Err = DisputareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Depth::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DisputareError::InvalidDepth(wanted.to_string()))
    }
}

/// Display capability attached to a depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthIcon {
    Lightbulb,
    Book,
    Brain,
}

impl DepthIcon {
    /// Terminal glyph for this icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            DepthIcon::Lightbulb => "\u{1f4a1}",
            DepthIcon::Book => "\u{1f4d6}",
            DepthIcon::Brain => "\u{1f9e0}",
        }
    }
}

/// Whether a reply is currently being generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Pending,
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStatus::Idle => write!(f, "Idle"),
            GenerationStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// What to do with a submit that arrives while another reply is pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Refuse the submit; nothing is appended.
    #[default]
    Reject,
    /// Let submits overlap. Assistant turns land in completion order.
    Allow,
}

// =============================================================================
// Structs
// =============================================================================

/// One message in the conversation. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }
}
