//! Engine collaborators backed by the local database.

use crate::db::{DbError, ReviewUpdate, SqliteRepository, TextRepository, WordRepository};
use crate::scheduler::RetentionScheduler;
use async_trait::async_trait;
use chrono::Utc;
use lexicon_core::{
    DueReview, EngineError, MeaningSavePolicy, Rating, Result, ReviewItem, ReviewScheduler, Text,
    VocabularyEntry, VocabularyStore,
};
use std::sync::{Arc, Mutex, MutexGuard};

impl From<DbError> for EngineError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::TextNotFound(id) => Self::TextNotFound(id),
            DbError::WordNotFound(id) => Self::WordNotFound(id),
            other => Self::Store(other.to_string()),
        }
    }
}

/// Vocabulary store and review scheduler over one SQLite database.
#[derive(Clone)]
pub struct LocalStore {
    repository: Arc<Mutex<SqliteRepository>>,
    scheduler: RetentionScheduler,
    policy: MeaningSavePolicy,
}

impl LocalStore {
    pub fn new(repository: SqliteRepository, policy: MeaningSavePolicy) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            scheduler: RetentionScheduler::default(),
            policy,
        }
    }

    /// Direct repository access for operations outside the engine.
    pub fn repository(&self) -> Result<MutexGuard<'_, SqliteRepository>> {
        self.repository
            .lock()
            .map_err(|_| EngineError::Store("repository lock poisoned".to_string()))
    }
}

#[async_trait]
impl VocabularyStore for LocalStore {
    async fn fetch_text_with_words(&self, text_id: i64) -> Result<(Text, Vec<VocabularyEntry>)> {
        Ok(self.repository()?.get_text_with_words(text_id)?)
    }

    async fn fetch_all_words(&self) -> Result<Vec<VocabularyEntry>> {
        Ok(self.repository()?.get_all_words()?)
    }

    async fn update_word_meaning(&self, word_id: i64, meaning: &str) -> Result<()> {
        self.repository()?
            .update_word_meaning(word_id, meaning, self.policy, Utc::now())?;
        Ok(())
    }

    async fn mark_word_known(&self, word_id: i64) -> Result<()> {
        self.repository()?.mark_word_known(word_id)?;
        Ok(())
    }

    async fn delete_word(&self, word_id: i64) -> Result<()> {
        self.repository()?.delete_word(word_id)?;
        Ok(())
    }
}

#[async_trait]
impl ReviewScheduler for LocalStore {
    async fn fetch_next_due_review(&self) -> Result<DueReview> {
        let due = self
            .repository()?
            .next_due_word(Utc::now())
            .map_err(|e| EngineError::Scheduler(e.to_string()))?;
        Ok(match due {
            Some(entry) => DueReview::Due(ReviewItem::from(&entry)),
            None => DueReview::NoneDue,
        })
    }

    async fn submit_review_rating(&self, word_id: i64, rating: Rating) -> Result<()> {
        let repo = self.repository()?;
        let word = repo
            .get_word(word_id)?
            .ok_or(EngineError::WordNotFound(word_id))?;

        let now = Utc::now();
        let scheduled = self.scheduler.schedule(
            word.stability,
            word.difficulty,
            word.last_review_date,
            rating,
            now,
        );
        tracing::debug!(
            word = %word.word,
            rating = rating.as_str(),
            stability = scheduled.stability,
            difficulty = scheduled.difficulty,
            interval_days = scheduled.interval_days,
            predicted_retention = scheduled.predicted_retention,
            "scheduled review"
        );

        repo.save_review(
            word_id,
            &ReviewUpdate {
                stability: scheduled.stability,
                difficulty: scheduled.difficulty,
                reviewed_at: now,
                next_review: scheduled.next_review,
            },
        )?;
        Ok(())
    }
}
