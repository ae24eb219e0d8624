//! Shared fixtures for engine integration tests.
//!
//! `FakeStore` implements both the vocabulary store and the review scheduler
//! in memory. It records every call, can fail a call once on request, and can
//! run a hook while a call is in flight (used to tear sessions down mid-request).

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use lexicon_core::{
    DueReview, EngineError, MeaningSavePolicy, Rating, Result, ReviewItem, ReviewScheduler, Text,
    VocabularyEntry, VocabularyStore, WordStatus,
};

/// Recorded external call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchTextWithWords(i64),
    FetchAllWords,
    UpdateWordMeaning(i64, String),
    MarkWordKnown(i64),
    DeleteWord(i64),
    FetchNextDue,
    SubmitRating(i64, Rating),
}

/// Call kinds that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    FetchTextWithWords,
    UpdateWordMeaning,
    MarkWordKnown,
    DeleteWord,
    FetchNextDue,
    SubmitRating,
}

type Hook = Box<dyn Fn(&Call) + Send + Sync>;

struct State {
    text: Text,
    words: Vec<VocabularyEntry>,
    due: VecDeque<ReviewItem>,
    calls: Vec<Call>,
    failing: HashSet<Method>,
}

pub struct FakeStore {
    state: Mutex<State>,
    hook: Mutex<Option<Hook>>,
    held_fetch: Mutex<Option<Arc<Notify>>>,
    policy: MeaningSavePolicy,
}

impl FakeStore {
    pub fn new(content: &str, words: &[(i64, &str, WordStatus)]) -> Arc<Self> {
        Self::with_policy(content, words, MeaningSavePolicy::PromoteToSeen)
    }

    pub fn with_policy(
        content: &str,
        words: &[(i64, &str, WordStatus)],
        policy: MeaningSavePolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                text: Text {
                    id: 1,
                    title: "Test".to_string(),
                    content: content.to_string(),
                },
                words: words
                    .iter()
                    .map(|(id, word, status)| VocabularyEntry::new(*id, *word, *status))
                    .collect(),
                due: VecDeque::new(),
                calls: Vec::new(),
                failing: HashSet::new(),
            }),
            hook: Mutex::new(None),
            held_fetch: Mutex::new(None),
            policy,
        })
    }

    /// Scheduler-only fake with the given due queue.
    pub fn with_due(items: &[(i64, &str, &str)]) -> Arc<Self> {
        let store = Self::new("", &[]);
        store.state().due = items
            .iter()
            .map(|(id, word, meaning)| ReviewItem {
                id: *id,
                word: word.to_string(),
                meaning: Some(meaning.to_string()),
            })
            .collect();
        store
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Fail the next call of `method`.
    pub fn fail_once(&self, method: Method) {
        self.state().failing.insert(method);
    }

    /// Run `hook` inside every subsequent call, after it is recorded.
    pub fn set_hook(&self, hook: impl Fn(&Call) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    /// Hold the next text fetch until the returned gate is notified.
    ///
    /// The held fetch answers with the data as it was when the call arrived.
    pub fn hold_next_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.held_fetch.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn set_status(&self, id: i64, status: WordStatus) {
        if let Some(word) = self.state().words.iter_mut().find(|w| w.id == id) {
            word.status = status;
        }
    }

    pub fn word(&self, id: i64) -> Option<VocabularyEntry> {
        self.state().words.iter().find(|w| w.id == id).cloned()
    }

    pub fn status_of(&self, id: i64) -> Option<WordStatus> {
        self.word(id).map(|w| w.status)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Record the call and report whether it should fail.
    fn record(&self, call: Call, method: Option<Method>) -> bool {
        let failed = {
            let mut state = self.state();
            state.calls.push(call.clone());
            method.map_or(false, |m| state.failing.remove(&m))
        };
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(&call);
        }
        failed
    }
}

fn injected(store: bool) -> EngineError {
    if store {
        EngineError::Store("injected failure".to_string())
    } else {
        EngineError::Scheduler("injected failure".to_string())
    }
}

#[async_trait]
impl VocabularyStore for FakeStore {
    async fn fetch_text_with_words(&self, text_id: i64) -> Result<(Text, Vec<VocabularyEntry>)> {
        if self.record(
            Call::FetchTextWithWords(text_id),
            Some(Method::FetchTextWithWords),
        ) {
            return Err(injected(true));
        }
        let snapshot = {
            let state = self.state();
            if state.text.id != text_id {
                return Err(EngineError::TextNotFound(text_id));
            }
            (state.text.clone(), state.words.clone())
        };
        let held = self.held_fetch.lock().unwrap().take();
        if let Some(gate) = held {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn fetch_all_words(&self) -> Result<Vec<VocabularyEntry>> {
        self.record(Call::FetchAllWords, None);
        Ok(self.state().words.clone())
    }

    async fn update_word_meaning(&self, word_id: i64, meaning: &str) -> Result<()> {
        if self.record(
            Call::UpdateWordMeaning(word_id, meaning.to_string()),
            Some(Method::UpdateWordMeaning),
        ) {
            return Err(injected(true));
        }
        let policy = self.policy;
        let mut state = self.state();
        let word = state
            .words
            .iter_mut()
            .find(|w| w.id == word_id)
            .ok_or(EngineError::WordNotFound(word_id))?;
        word.meaning = Some(meaning.to_string());
        word.status = policy.status_after_save(word.status);
        Ok(())
    }

    async fn mark_word_known(&self, word_id: i64) -> Result<()> {
        if self.record(Call::MarkWordKnown(word_id), Some(Method::MarkWordKnown)) {
            return Err(injected(true));
        }
        let mut state = self.state();
        let word = state
            .words
            .iter_mut()
            .find(|w| w.id == word_id)
            .ok_or(EngineError::WordNotFound(word_id))?;
        word.status = WordStatus::Known;
        word.next_review_date = None;
        Ok(())
    }

    async fn delete_word(&self, word_id: i64) -> Result<()> {
        if self.record(Call::DeleteWord(word_id), Some(Method::DeleteWord)) {
            return Err(injected(true));
        }
        self.state().words.retain(|w| w.id != word_id);
        Ok(())
    }
}

#[async_trait]
impl ReviewScheduler for FakeStore {
    async fn fetch_next_due_review(&self) -> Result<DueReview> {
        if self.record(Call::FetchNextDue, Some(Method::FetchNextDue)) {
            return Err(injected(false));
        }
        Ok(match self.state().due.front() {
            Some(item) => DueReview::Due(item.clone()),
            None => DueReview::NoneDue,
        })
    }

    async fn submit_review_rating(&self, word_id: i64, rating: Rating) -> Result<()> {
        if self.record(
            Call::SubmitRating(word_id, rating),
            Some(Method::SubmitRating),
        ) {
            return Err(injected(false));
        }
        let mut state = self.state();
        if state.due.front().map(|item| item.id) == Some(word_id) {
            state.due.pop_front();
        }
        Ok(())
    }
}
