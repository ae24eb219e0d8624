//! Word selection and the meaning draft of a reading view.

use super::ReadingView;
use crate::error::Result;
use crate::external::VocabularyStore;
use crate::normalize::normalize;
use crate::types::{Outcome, SkipReason, VocabularyEntry};

/// Selected word and the unsaved meaning typed for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
    draft: String,
}

impl Selection {
    /// Select a word. Any draft for the previous word is dropped.
    pub fn select(&mut self, word: &str) {
        let key = normalize(word);
        self.selected = (!key.is_empty()).then_some(key);
        self.draft.clear();
    }

    pub fn deselect(&mut self) {
        self.clear();
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Normalized key of the selected word.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn has_pending_draft(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.draft.clear();
    }
}

impl<S: VocabularyStore + ?Sized> ReadingView<S> {
    pub fn select(&mut self, word: &str) {
        self.selection.select(word);
    }

    pub fn deselect(&mut self) {
        self.selection.deselect();
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.selection.set_draft(draft);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selection.selected()
    }

    pub fn draft(&self) -> &str {
        self.selection.draft()
    }

    /// Entry behind the selected word in the current snapshot.
    pub fn selected_entry(&self) -> Option<VocabularyEntry> {
        let key = self.selection.selected()?;
        self.index.snapshot().resolve(key).cloned()
    }

    /// Store the draft as the meaning of the selected word.
    ///
    /// A blank draft or a selection with no entry is a no-op. On failure the
    /// draft is kept so the user can retry.
    pub async fn save_meaning(&mut self) -> Result<Outcome> {
        self.ensure_open()?;

        if self.selection.selected().is_none() {
            return Ok(Outcome::Skipped(SkipReason::NoSelection));
        }
        let meaning = self.selection.draft().trim().to_string();
        if meaning.is_empty() {
            return Ok(Outcome::Skipped(SkipReason::BlankDraft));
        }
        let Some(entry) = self.selected_entry() else {
            return Ok(Outcome::Skipped(SkipReason::NoMatchingEntry));
        };

        let ticket = self.lifecycle.ticket();
        let result = self.store.update_word_meaning(entry.id, &meaning).await;
        if !self.lifecycle.is_current(ticket) {
            return Ok(Outcome::Discarded);
        }
        if let Err(err) = result {
            tracing::warn!(word_id = entry.id, error = %err, "failed to save meaning");
            return Err(err);
        }

        tracing::info!(word_id = entry.id, word = %entry.word, "saved meaning");
        self.selection.clear_draft();
        self.reload(ticket).await?;
        Ok(self.applied_unless_stale(ticket))
    }

    /// Promote the selected word to `Known`.
    ///
    /// A pending draft is saved first. Promoting a `Known` word again still
    /// calls the store, which treats it as a no-op.
    pub async fn mark_known(&mut self) -> Result<Outcome> {
        self.ensure_open()?;

        if self.selection.selected().is_none() {
            return Ok(Outcome::Skipped(SkipReason::NoSelection));
        }
        if self.selected_entry().is_none() {
            return Ok(Outcome::Skipped(SkipReason::NoMatchingEntry));
        }

        if self.selection.has_pending_draft() {
            if let Outcome::Discarded = self.save_meaning().await? {
                return Ok(Outcome::Discarded);
            }
        }

        // The save may have rebuilt the index.
        let Some(entry) = self.selected_entry() else {
            return Ok(Outcome::Skipped(SkipReason::NoMatchingEntry));
        };

        let ticket = self.lifecycle.ticket();
        let result = self.store.mark_word_known(entry.id).await;
        if !self.lifecycle.is_current(ticket) {
            return Ok(Outcome::Discarded);
        }
        if let Err(err) = result {
            tracing::warn!(word_id = entry.id, error = %err, "failed to mark word known");
            return Err(err);
        }

        tracing::info!(word_id = entry.id, word = %entry.word, "marked word known");
        self.reload(ticket).await?;
        Ok(self.applied_unless_stale(ticket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_normalizes_and_clears_draft() {
        let mut selection = Selection::default();
        selection.select("Hund");
        selection.set_draft("dog");

        selection.select("„Katze“,");
        assert_eq!(selection.selected(), Some("Katze"));
        assert_eq!(selection.draft(), "");
    }

    #[test]
    fn punctuation_only_selects_nothing() {
        let mut selection = Selection::default();
        selection.select("...");
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn whitespace_draft_is_not_pending() {
        let mut selection = Selection::default();
        selection.select("Hund");
        selection.set_draft("   ");
        assert!(!selection.has_pending_draft());
        selection.set_draft(" dog ");
        assert!(selection.has_pending_draft());
    }

    #[test]
    fn deselect_clears_everything() {
        let mut selection = Selection::default();
        selection.select("Hund");
        selection.set_draft("dog");
        selection.deselect();
        assert_eq!(selection, Selection::default());
    }
}
