//! Core types for the reading engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stability of an entry that was never reviewed.
pub const BASE_STABILITY: f64 = 0.5;
/// Difficulty of an entry that was never reviewed.
pub const BASE_DIFFICULTY: f64 = 0.3;

/// Familiarity tier of a vocabulary entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStatus {
    /// Present in the vocabulary but not yet interacted with.
    #[default]
    New,
    /// Has a recorded meaning or has been reviewed at least once.
    Seen,
    /// Explicitly promoted; excluded from review.
    Known,
}

impl WordStatus {
    /// Get the status name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Seen => "seen",
            Self::Known => "known",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "seen" => Some(Self::Seen),
            "known" => Some(Self::Known),
            _ => None,
        }
    }
}

/// Status shown for a rendered segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Unmatched,
    New,
    Seen,
    Known,
}

impl From<WordStatus> for DisplayStatus {
    fn from(status: WordStatus) -> Self {
        match status {
            WordStatus::New => Self::New,
            WordStatus::Seen => Self::Seen,
            WordStatus::Known => Self::Known,
        }
    }
}

/// Recall feedback for a review.
///
/// Forwarded to the scheduler as-is; the engine gives the values no numeric meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// All ratings in ascending order of ease.
    pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }

    /// Parse from string, ignoring ASCII case.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rating| rating.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// Stored text. Read-only for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// Vocabulary entry as supplied by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: i64,
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    pub status: WordStatus,
    pub stability: f64,
    pub difficulty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    /// Only meaningful while the status is `Seen`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
}

impl VocabularyEntry {
    /// Create a fresh entry with default scheduling fields.
    pub fn new(id: i64, word: impl Into<String>, status: WordStatus) -> Self {
        Self {
            id,
            word: word.into(),
            meaning: None,
            status,
            stability: BASE_STABILITY,
            difficulty: BASE_DIFFICULTY,
            last_review_date: None,
            next_review_date: None,
        }
    }

    /// Recorded meaning, treating an empty string as unset.
    pub fn meaning(&self) -> Option<&str> {
        self.meaning.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Due entry surfaced by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: i64,
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
}

impl From<&VocabularyEntry> for ReviewItem {
    fn from(entry: &VocabularyEntry) -> Self {
        Self {
            id: entry.id,
            word: entry.word.clone(),
            meaning: entry.meaning.clone(),
        }
    }
}

/// Segment kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    WordCandidate,
    Separator,
}

/// Verbatim slice of rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
    /// Byte offset of the first character in the raw source.
    pub offset: usize,
}

impl Segment {
    pub fn is_word(&self) -> bool {
        self.kind == SegmentKind::WordCandidate
    }
}

/// Segment with its vocabulary match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedSegment {
    #[serde(flatten)]
    pub segment: Segment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_ref: Option<i64>,
    pub display_status: DisplayStatus,
}

impl AnnotatedSegment {
    /// Whether the segment opens the annotation panel when clicked.
    pub fn is_clickable(&self) -> bool {
        self.vocabulary_ref.is_some()
    }
}

/// Distinct entries per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub new: usize,
    pub seen: usize,
    pub known: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: WordStatus) {
        match status {
            WordStatus::New => self.new += 1,
            WordStatus::Seen => self.seen += 1,
            WordStatus::Known => self.known += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.new + self.seen + self.known
    }
}

/// What a store does to an entry's status when a meaning is saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeaningSavePolicy {
    /// A `New` entry becomes `Seen` and enters the review queue.
    #[default]
    PromoteToSeen,
    /// Status is left alone until the word is first reviewed.
    DeferToScheduler,
}

impl MeaningSavePolicy {
    /// Status after a meaning save. `Known` is never demoted.
    pub fn status_after_save(self, current: WordStatus) -> WordStatus {
        match (self, current) {
            (Self::PromoteToSeen, WordStatus::New) => WordStatus::Seen,
            (_, status) => status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PromoteToSeen => "promote",
            Self::DeferToScheduler => "defer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "promote" | "promote_to_seen" => Some(Self::PromoteToSeen),
            "defer" | "defer_to_scheduler" => Some(Self::DeferToScheduler),
            _ => None,
        }
    }
}

/// Why an action was skipped without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoSelection,
    BlankDraft,
    NoMatchingEntry,
}

/// Result of a session action that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
    /// The response arrived after the session was torn down or restarted.
    Discarded,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}
