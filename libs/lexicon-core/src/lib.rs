//! Core reading engine shared by reader front ends.
//!
//! Provides:
//! - Text segmentation into word candidates and separators
//! - Word normalization for vocabulary lookups
//! - An immutable vocabulary index with copy-on-refresh snapshots
//! - Status annotation of segmented text
//! - Reading view with word selection, meaning saves and promotion to known
//! - Spaced repetition review session state machine
//! - Per-locale dictionary link table

pub mod annotate;
pub mod error;
pub mod external;
pub mod index;
pub mod links;
pub mod normalize;
pub mod segment;
pub mod session;
pub mod types;

pub use annotate::annotate;
pub use error::{EngineError, Result};
pub use external::{DueReview, ReviewScheduler, VocabularyStore};
pub use index::{SharedIndex, VocabularyIndex};
pub use links::{dictionary_link, DictionaryProvider};
pub use normalize::{normalize, strict_key};
pub use segment::{segment, strip_hyphens, vocabulary_words};
pub use session::{Lifecycle, ReadingView, ReviewSession, ReviewState};
pub use types::{
    AnnotatedSegment, DisplayStatus, MeaningSavePolicy, Outcome, Rating, ReviewItem, Segment,
    SegmentKind, SkipReason, StatusCounts, Text, VocabularyEntry, WordStatus, BASE_DIFFICULTY,
    BASE_STABILITY,
};
