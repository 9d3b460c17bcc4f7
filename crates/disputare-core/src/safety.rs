//! Sensitive-topic filter and the help resources offered when it trips.
//!
//! The filter is a plain case-insensitive substring scan over a fixed keyword
//! list. A match preempts the remote completion entirely; the caller gets the
//! resource list instead.

use std::fmt;

/// Lowercase keywords that preempt the remote call.
pub const SENSITIVE_TOPICS: &[&str] = &[
    "suicide",
    "self-harm",
    "depression",
    "anxiety",
    "abuse",
    "violence",
    "eating disorder",
];

/// How to reach a help resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Phone(&'static str),
    Text(&'static str),
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contact::Phone(number) => f.write_str(number),
            Contact::Text(shortcode) => f.write_str(shortcode),
        }
    }
}

/// A crisis line or helpline listed in the safety message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpResource {
    pub name: &'static str,
    pub contact: Contact,
}

pub const HELP_RESOURCES: &[HelpResource] = &[
    HelpResource {
        name: "National Suicide Prevention Lifeline",
        contact: Contact::Phone("1-800-273-8255"),
    },
    HelpResource {
        name: "Crisis Text Line",
        contact: Contact::Text("HOME to 741741"),
    },
    HelpResource {
        name: "National Domestic Violence Hotline",
        contact: Contact::Phone("1-800-799-7233"),
    },
    HelpResource {
        name: "SAMHSA's National Helpline",
        contact: Contact::Phone("1-800-662-4357"),
    },
];

const SAFETY_PREAMBLE: &str = "I've detected that you might be discussing a sensitive topic. \
While I'm not equipped to provide professional help, here are some resources that might be helpful:";

const SAFETY_CLOSING: &str = "Remember, it's important to seek help from qualified professionals \
for serious concerns. Your well-being is important.";

/// Keyword filter over [`SENSITIVE_TOPICS`].
#[derive(Debug, Clone, Copy)]
pub struct SensitiveTopicFilter {
    topics: &'static [&'static str],
}

impl Default for SensitiveTopicFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SensitiveTopicFilter {
    pub fn new() -> Self {
        Self {
            topics: SENSITIVE_TOPICS,
        }
    }

    /// Returns the first keyword found in `text`, ignoring case.
    pub fn matched_topic(&self, text: &str) -> Option<&'static str> {
        let lowered = text.to_lowercase();
        self.topics
            .iter()
            .copied()
            .find(|topic| lowered.contains(topic))
    }

    /// Returns true if `text` mentions any sensitive keyword.
    pub fn matches(&self, text: &str) -> bool {
        self.matched_topic(text).is_some()
    }

    /// The fixed resource message.
    ///
    /// Identical for every keyword and every depth.
    pub fn safety_message(&self) -> String {
        safety_message()
    }
}

/// Build the resource message listing every entry in [`HELP_RESOURCES`].
pub fn safety_message() -> String {
    let resources = HELP_RESOURCES
        .iter()
        .map(|r| format!("\u{2022} {}: {}", r.name, r.contact))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{SAFETY_PREAMBLE}\n\n{resources}\n\n{SAFETY_CLOSING}")
}
