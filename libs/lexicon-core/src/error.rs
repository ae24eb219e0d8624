//! Error types for lexicon-core.

use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by engine sessions and external collaborators.
///
/// None of these is fatal. A session that returns one keeps its prior state
/// and the action may be retried.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store request failed: {0}")]
    Store(String),

    #[error("scheduler request failed: {0}")]
    Scheduler(String),

    #[error("text not found: {0}")]
    TextNotFound(i64),

    #[error("word not found: {0}")]
    WordNotFound(i64),

    #[error("answer must be revealed before rating")]
    AnswerNotRevealed,

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("rating targets word {actual} but word {expected} is in review")]
    ItemMismatch { expected: i64, actual: i64 },

    #[error("session is closed")]
    Closed,
}

impl EngineError {
    /// Whether the error came from a store or scheduler call.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Scheduler(_) | Self::TextNotFound(_) | Self::WordNotFound(_)
        )
    }
}
