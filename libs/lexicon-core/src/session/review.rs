//! Review session state machine.

use super::Lifecycle;
use crate::error::{EngineError, Result};
use crate::external::{DueReview, ReviewScheduler};
use crate::types::{Outcome, Rating, ReviewItem};
use std::sync::Arc;

/// Where a review session stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewState {
    /// Waiting for the scheduler to hand out the next due item.
    Loading,
    Presenting(ReviewItem),
    AnswerRevealed(ReviewItem),
    /// Nothing is due. Only a restart leaves this state.
    Exhausted,
}

impl ReviewState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Presenting(_) => "presenting",
            Self::AnswerRevealed(_) => "answer_revealed",
            Self::Exhausted => "exhausted",
        }
    }

    pub fn item(&self) -> Option<&ReviewItem> {
        match self {
            Self::Presenting(item) | Self::AnswerRevealed(item) => Some(item),
            Self::Loading | Self::Exhausted => None,
        }
    }
}

/// Pulls due items one at a time and forwards ratings to the scheduler.
pub struct ReviewSession<R: ReviewScheduler + ?Sized> {
    scheduler: Arc<R>,
    state: ReviewState,
    lifecycle: Lifecycle,
    submitted: usize,
}

impl<R: ReviewScheduler + ?Sized> ReviewSession<R> {
    /// Create a session in `Loading`. Call [`load_next`](Self::load_next) to fetch.
    pub fn new(scheduler: Arc<R>) -> Self {
        Self {
            scheduler,
            state: ReviewState::Loading,
            lifecycle: Lifecycle::new(),
            submitted: 0,
        }
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn current_item(&self) -> Option<&ReviewItem> {
        self.state.item()
    }

    pub fn is_answer_visible(&self) -> bool {
        matches!(self.state, ReviewState::AnswerRevealed(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, ReviewState::Exhausted)
    }

    /// Ratings successfully submitted since the session was created.
    pub fn reviews_submitted(&self) -> usize {
        self.submitted
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    /// Fetch the next due item.
    pub async fn load_next(&mut self) -> Result<Outcome> {
        self.ensure_open()?;
        if self.state != ReviewState::Loading {
            return Err(self.invalid("load next item"));
        }

        let ticket = self.lifecycle.ticket();
        let result = self.scheduler.fetch_next_due_review().await;
        if !self.lifecycle.is_current(ticket) {
            tracing::debug!("dropping due review for stale session");
            return Ok(Outcome::Discarded);
        }

        match result {
            Ok(DueReview::Due(item)) => {
                tracing::debug!(word_id = item.id, "presenting review item");
                self.state = ReviewState::Presenting(item);
            }
            Ok(DueReview::NoneDue) => {
                tracing::info!(submitted = self.submitted, "no reviews due");
                self.state = ReviewState::Exhausted;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch next review");
                return Err(err);
            }
        }
        Ok(Outcome::Applied)
    }

    /// Show or hide the answer of the current item.
    pub fn toggle_answer(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.state = match std::mem::replace(&mut self.state, ReviewState::Loading) {
            ReviewState::Presenting(item) => ReviewState::AnswerRevealed(item),
            ReviewState::AnswerRevealed(item) => ReviewState::Presenting(item),
            other => {
                let err = EngineError::InvalidTransition {
                    state: other.name(),
                    action: "toggle answer",
                };
                self.state = other;
                return Err(err);
            }
        };
        Ok(())
    }

    /// Reveal the answer. Already revealed is a no-op.
    pub fn reveal_answer(&mut self) -> Result<()> {
        match self.state {
            ReviewState::Presenting(_) => self.toggle_answer(),
            ReviewState::AnswerRevealed(_) => self.ensure_open(),
            _ => Err(self.invalid("reveal answer")),
        }
    }

    /// Rate the revealed item and move on to the next one.
    ///
    /// The rating is submitted before the next fetch is issued. If the
    /// submission fails the item stays revealed for a retry.
    pub async fn rate(&mut self, item_id: i64, rating: Rating) -> Result<Outcome> {
        self.ensure_open()?;
        let item = match &self.state {
            ReviewState::AnswerRevealed(item) => item,
            ReviewState::Presenting(_) => return Err(EngineError::AnswerNotRevealed),
            _ => return Err(self.invalid("rate")),
        };
        if item.id != item_id {
            return Err(EngineError::ItemMismatch {
                expected: item.id,
                actual: item_id,
            });
        }

        let ticket = self.lifecycle.ticket();
        let result = self.scheduler.submit_review_rating(item_id, rating).await;
        if !self.lifecycle.is_current(ticket) {
            return Ok(Outcome::Discarded);
        }
        if let Err(err) = result {
            tracing::warn!(word_id = item_id, rating = rating.as_str(), error = %err, "failed to submit rating");
            return Err(err);
        }

        self.submitted += 1;
        tracing::info!(word_id = item_id, rating = rating.as_str(), "submitted review");
        self.state = ReviewState::Loading;
        self.load_next().await
    }

    /// Start over from `Loading`, dropping anything in flight.
    pub async fn restart(&mut self) -> Result<Outcome> {
        self.ensure_open()?;
        self.lifecycle.invalidate();
        self.state = ReviewState::Loading;
        self.load_next().await
    }

    /// Leave the review feature.
    pub fn close(&mut self) {
        self.lifecycle.close();
        tracing::debug!(submitted = self.submitted, "closed review session");
    }

    fn ensure_open(&self) -> Result<()> {
        if self.lifecycle.is_closed() {
            return Err(EngineError::Closed);
        }
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> EngineError {
        EngineError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }
}
