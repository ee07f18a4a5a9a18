//! Scholargate error types

use std::time::Duration;

/// Coarse classification of a [`ScholarGateError`].
///
/// UI layers usually only display the error message; the kind is there for
/// callers that need to branch (e.g. offer a rewarded ad on
/// [`ErrorKind::QuotaExhausted`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Offline,
    QuotaExhausted,
    RemoteService,
    Timeout,
    MalformedResponse,
    InvalidInput,
    Storage,
    Configuration,
}

/// Scholargate error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScholarGateError {
    // Gateway policy errors
    #[error("You're offline. Please connect to the internet for AI features.")]
    Offline,

    #[error("Daily AI limit reached. Watch an ad to get more uses, or come back tomorrow!")]
    QuotaExhausted,

    // Remote errors
    /// Backend answered with a non-2xx status, a logical `{error}` payload,
    /// or could not be reached at all (`status` is `None` in the last two cases).
    #[error("{message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },

    #[error("Request timed out after {0:?}. Please try again.")]
    Timeout(Duration),

    #[error("malformed AI response: {0}")]
    MalformedResponse(String),

    // Caller errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Local errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ScholarGateError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Offline => ErrorKind::Offline,
            Self::QuotaExhausted => ErrorKind::QuotaExhausted,
            Self::Remote { .. } => ErrorKind::RemoteService,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Backend refused the call because of its own rate limiting (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Remote { status: Some(429), .. })
    }

    /// Backend's upstream provider credits are used up (HTTP 402).
    pub fn is_credits_exhausted(&self) -> bool {
        matches!(self, Self::Remote { status: Some(402), .. })
    }
}

impl From<serde_json::Error> for ScholarGateError {
    fn from(err: serde_json::Error) -> Self {
        ScholarGateError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for Scholargate operations
pub type Result<T> = std::result::Result<T, ScholarGateError>;
