//! Vocabulary index keyed by normalized word.
//!
//! An index is built once from a store snapshot and never modified. After any
//! mutation the owner fetches a fresh snapshot and swaps in a new index
//! through [`SharedIndex`].

use crate::normalize::{normalize, strict_key};
use crate::types::{StatusCounts, VocabularyEntry};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Entry displaced by a later entry with the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub key: String,
    pub shadowed_id: i64,
    pub winner_id: i64,
}

/// Immutable mapping from normalized word to vocabulary entry.
#[derive(Debug, Clone, Default)]
pub struct VocabularyIndex {
    by_key: HashMap<String, VocabularyEntry>,
    collisions: Vec<Collision>,
}

impl VocabularyIndex {
    /// Build from store entries. On key collision the later entry wins.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = VocabularyEntry>,
    {
        let mut by_key: HashMap<String, VocabularyEntry> = HashMap::new();
        let mut collisions = Vec::new();

        for entry in entries {
            let key = normalize(&entry.word);
            if key.is_empty() {
                tracing::debug!(word_id = entry.id, "skipping entry with empty key");
                continue;
            }
            let winner_id = entry.id;
            if let Some(previous) = by_key.insert(key.clone(), entry) {
                // The same entry listed twice is not a collision.
                if previous.id != winner_id {
                    tracing::debug!(
                        key = %key,
                        shadowed = previous.id,
                        winner = winner_id,
                        "vocabulary key collision"
                    );
                    collisions.push(Collision {
                        key,
                        shadowed_id: previous.id,
                        winner_id,
                    });
                }
            }
        }

        Self { by_key, collisions }
    }

    /// Exact match on an already normalized key.
    pub fn get(&self, key: &str) -> Option<&VocabularyEntry> {
        self.by_key.get(key)
    }

    /// Normalize a candidate and look it up.
    pub fn lookup(&self, candidate: &str) -> Option<&VocabularyEntry> {
        self.get(&normalize(candidate))
    }

    /// Resolve a selected word for save and promote actions.
    ///
    /// Tries the strict key first, then the lookup key.
    pub fn resolve(&self, selected: &str) -> Option<&VocabularyEntry> {
        let strict = strict_key(selected);
        self.get(strict.trim()).or_else(|| self.lookup(selected))
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Distinct entries per status.
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for entry in self.by_key.values() {
            counts.add(entry.status);
        }
        counts
    }
}

/// Shared cell holding the current index snapshot.
///
/// Readers get an `Arc` to a complete index; a refresh swaps the whole
/// snapshot, so a reader sees either the old or the new index.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    current: Arc<RwLock<Current>>,
}

#[derive(Debug, Default)]
struct Current {
    /// Request number of the fetch the index was built from.
    request: u64,
    index: Arc<VocabularyIndex>,
}

impl SharedIndex {
    pub fn new(index: VocabularyIndex) -> Self {
        Self {
            current: Arc::new(RwLock::new(Current {
                request: 0,
                index: Arc::new(index),
            })),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<VocabularyIndex> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard.index)
    }

    /// Swap in an index built from fetch number `request`, unless an index
    /// from a later fetch is already in place. Returns whether it was swapped.
    pub fn replace(&self, index: VocabularyIndex, request: u64) -> bool {
        let fresh = Arc::new(index);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.request > request {
            return false;
        }
        *guard = Current {
            request,
            index: fresh,
        };
        true
    }
}
