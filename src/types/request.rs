//! Request types sent to the AI backend

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ScholarGateError;

/// Category of generated content.
///
/// Serialised lowercase; the backend picks its system prompt from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiKind {
    /// Conversational homework explanation.
    Explain,
    /// A deck of flashcards on a topic.
    Flashcards,
    /// A multiple-choice quiz on a topic.
    Quiz,
    /// Find and explain a formula from a natural language query.
    Formula,
}

impl AiKind {
    pub const ALL: [AiKind; 4] = [
        AiKind::Explain,
        AiKind::Flashcards,
        AiKind::Quiz,
        AiKind::Formula,
    ];

    /// Wire name, also used as the cache key namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiKind::Explain => "explain",
            AiKind::Flashcards => "flashcards",
            AiKind::Quiz => "quiz",
            AiKind::Formula => "formula",
        }
    }
}

impl fmt::Display for AiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiKind {
    type Err = ScholarGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AiKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScholarGateError::InvalidInput(format!("unknown AI request type: {s}")))
    }
}

/// Body of a remote invocation: `{"type": ..., "prompt": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiRequest {
    #[serde(rename = "type")]
    pub kind: AiKind,
    pub prompt: String,
}

impl AiRequest {
    pub fn new(kind: AiKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
        }
    }
}
