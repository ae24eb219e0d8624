//! Reading view: one text, its vocabulary index, and the word selection.

use super::{Lifecycle, Selection, Ticket};
use crate::annotate::annotate;
use crate::error::{EngineError, Result};
use crate::external::VocabularyStore;
use crate::index::{SharedIndex, VocabularyIndex};
use crate::segment::segment;
use crate::types::{AnnotatedSegment, Outcome, Segment, StatusCounts, Text};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// An open text with its vocabulary.
///
/// The text is segmented once when the view opens. The vocabulary index is
/// replaced wholesale after every mutation and the text re-annotated from
/// the new snapshot.
pub struct ReadingView<S: VocabularyStore + ?Sized> {
    pub(super) store: Arc<S>,
    text: Text,
    segments: Vec<Segment>,
    pub(super) index: SharedIndex,
    pub(super) selection: Selection,
    pub(super) lifecycle: Lifecycle,
    refreshes: AtomicU64,
}

impl<S: VocabularyStore + ?Sized> ReadingView<S> {
    /// Fetch a text with its words and build the initial index.
    pub async fn open(store: Arc<S>, text_id: i64) -> Result<Self> {
        let (text, entries) = store.fetch_text_with_words(text_id).await?;
        let segments = segment(&text.content);
        let index = VocabularyIndex::build(entries);

        tracing::debug!(
            text_id,
            segments = segments.len(),
            entries = index.len(),
            "opened reading view"
        );

        Ok(Self {
            store,
            text,
            segments,
            index: SharedIndex::new(index),
            selection: Selection::default(),
            lifecycle: Lifecycle::new(),
            refreshes: AtomicU64::new(0),
        })
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Current index snapshot.
    pub fn index(&self) -> Arc<VocabularyIndex> {
        self.index.snapshot()
    }

    /// Annotate the text against the current snapshot.
    pub fn annotated(&self) -> Vec<AnnotatedSegment> {
        annotate(&self.segments, &self.index.snapshot())
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.index.snapshot().status_counts()
    }

    /// Teardown handle. Closing it from another task drops in-flight results.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Navigate away from the view.
    pub fn close(&mut self) {
        self.lifecycle.close();
        self.selection.clear();
        tracing::debug!(text_id = self.text.id, "closed reading view");
    }

    /// Refetch the vocabulary and swap in a new index.
    pub async fn refresh(&self) -> Result<Outcome> {
        self.ensure_open()?;
        self.reload(self.lifecycle.ticket()).await
    }

    /// Delete an entry from the vocabulary and rebuild the index.
    pub async fn delete_word(&mut self, word_id: i64) -> Result<Outcome> {
        self.ensure_open()?;
        let ticket = self.lifecycle.ticket();

        let result = self.store.delete_word(word_id).await;
        if !self.lifecycle.is_current(ticket) {
            return Ok(Outcome::Discarded);
        }
        result?;
        tracing::info!(word_id, "deleted word");

        let selected_gone = self
            .selection
            .selected()
            .and_then(|key| self.index.snapshot().resolve(key).map(|e| e.id))
            == Some(word_id);
        if selected_gone {
            self.selection.clear();
        }

        self.reload(ticket).await?;
        Ok(self.applied_unless_stale(ticket))
    }

    pub(super) fn ensure_open(&self) -> Result<()> {
        if self.lifecycle.is_closed() {
            return Err(EngineError::Closed);
        }
        Ok(())
    }

    pub(super) fn applied_unless_stale(&self, ticket: Ticket) -> Outcome {
        if self.lifecycle.is_current(ticket) {
            Outcome::Applied
        } else {
            Outcome::Discarded
        }
    }

    /// Fetch a fresh snapshot and replace the index.
    ///
    /// Refreshes may overlap. A result is dropped once an index from a later
    /// refresh is in place; if the later refresh fails, the earlier result
    /// still applies.
    pub(super) async fn reload(&self, ticket: Ticket) -> Result<Outcome> {
        let request = self.refreshes.fetch_add(1, Ordering::AcqRel) + 1;
        let result = self.store.fetch_text_with_words(self.text.id).await;

        if !self.lifecycle.is_current(ticket) {
            tracing::debug!(text_id = self.text.id, "dropping refresh for closed view");
            return Ok(Outcome::Discarded);
        }

        let (_, entries) = result?;
        let index = VocabularyIndex::build(entries);
        let entries = index.len();
        if !self.index.replace(index, request) {
            tracing::debug!(text_id = self.text.id, request, "dropping superseded refresh");
            return Ok(Outcome::Discarded);
        }
        tracing::debug!(
            text_id = self.text.id,
            entries,
            "rebuilt vocabulary index"
        );
        Ok(Outcome::Applied)
    }
}
