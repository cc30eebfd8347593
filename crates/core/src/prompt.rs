//! Outbound prompt types — the assembled payload handed to the gateway.
//!
//! A prompt is derived, never stored: an ordered sequence of role-tagged text
//! segments built fresh per request and discarded after the call completes.
//! It is never mutated after construction.

use serde::{Deserialize, Serialize};

/// The provider's role vocabulary. `Assistant` turns map to `Model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    User,
    Model,
}

/// One role-tagged text segment of an outbound prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSegment {
    pub role: PromptRole,
    pub text: String,
}

impl PromptSegment {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Model,
            text: text.into(),
        }
    }
}

/// An ordered, immutable segment sequence for a single gateway call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutboundPrompt {
    segments: Vec<PromptSegment>,
}

impl OutboundPrompt {
    pub fn new(segments: Vec<PromptSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PromptSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Concatenated text of all segments, in order. Used by tests and logging.
    pub fn flattened_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
