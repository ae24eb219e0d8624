//! Status annotation of segmented text.

use crate::index::VocabularyIndex;
use crate::normalize::normalize;
use crate::types::{AnnotatedSegment, DisplayStatus, Segment};

/// Classify every segment against the index.
///
/// Always run over the full sequence after an index swap; one status change
/// affects every occurrence of the word.
pub fn annotate(segments: &[Segment], index: &VocabularyIndex) -> Vec<AnnotatedSegment> {
    segments
        .iter()
        .map(|segment| annotate_segment(segment, index))
        .collect()
}

fn annotate_segment(segment: &Segment, index: &VocabularyIndex) -> AnnotatedSegment {
    let matched = if segment.is_word() {
        index.get(&normalize(&segment.text))
    } else {
        None
    };

    AnnotatedSegment {
        segment: segment.clone(),
        vocabulary_ref: matched.map(|entry| entry.id),
        display_status: matched
            .map(|entry| DisplayStatus::from(entry.status))
            .unwrap_or(DisplayStatus::Unmatched),
    }
}
