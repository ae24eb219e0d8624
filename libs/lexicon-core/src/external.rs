//! Contracts for the store and scheduler the engine talks to.
//!
//! Transport is up to the implementor: in-process, local database, or
//! remote service. Every call is a single request/response.

use crate::error::Result;
use crate::types::{Rating, ReviewItem, Text, VocabularyEntry};
use async_trait::async_trait;

/// Persistent store of texts and vocabulary entries.
#[async_trait]
pub trait VocabularyStore: Send + Sync {
    /// Text plus the entries of its vocabulary.
    async fn fetch_text_with_words(&self, text_id: i64) -> Result<(Text, Vec<VocabularyEntry>)>;

    /// Global vocabulary listing.
    async fn fetch_all_words(&self) -> Result<Vec<VocabularyEntry>>;

    /// Overwrite the meaning of an entry.
    async fn update_word_meaning(&self, word_id: i64, meaning: &str) -> Result<()>;

    /// Force an entry to `Known`. Repeating the call is a no-op.
    async fn mark_word_known(&self, word_id: i64) -> Result<()>;

    async fn delete_word(&self, word_id: i64) -> Result<()>;
}

/// Result of asking the scheduler for work.
#[derive(Debug, Clone, PartialEq)]
pub enum DueReview {
    Due(ReviewItem),
    /// Nothing is due. Not a failure.
    NoneDue,
}

/// Spaced repetition scheduler owning the due queue and interval math.
#[async_trait]
pub trait ReviewScheduler: Send + Sync {
    async fn fetch_next_due_review(&self) -> Result<DueReview>;

    /// Must complete before the next fetch so a review is never counted twice.
    async fn submit_review_rating(&self, word_id: i64, rating: Rating) -> Result<()>;
}
