//! Text segmentation into word candidates and separators.
//!
//! Hyphens are line-break artifacts in most imported texts, so they are
//! dropped from the rendered text before segmentation. Everything else is
//! preserved: concatenating the segments of a text gives back the text with
//! its hyphens removed.

use crate::normalize::{normalize, strict_key};
use crate::types::{Segment, SegmentKind};
use std::borrow::Cow;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;

/// Characters removed before segmentation (hyphen-minus, soft hyphen).
const HYPHENS: [char; 2] = ['-', '\u{00AD}'];

/// Remove hyphens from raw text.
pub fn strip_hyphens(raw: &str) -> Cow<'_, str> {
    if raw.contains(&HYPHENS[..]) {
        Cow::Owned(raw.chars().filter(|c| !HYPHENS.contains(c)).collect())
    } else {
        Cow::Borrowed(raw)
    }
}

/// Split raw text into alternating runs of word candidates and separators.
///
/// Offsets point into `raw` itself, not into the hyphen-stripped text.
pub fn segment(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_kind: Option<SegmentKind> = None;
    let mut start = 0;

    for (offset, ch) in raw.char_indices() {
        if HYPHENS.contains(&ch) {
            continue;
        }

        let kind = classify(ch, current_kind);
        if current_kind != Some(kind) {
            if let Some(previous) = current_kind {
                segments.push(Segment {
                    text: std::mem::take(&mut current),
                    kind: previous,
                    offset: start,
                });
            }
            current_kind = Some(kind);
            start = offset;
        }
        current.push(ch);
    }

    if let Some(kind) = current_kind {
        segments.push(Segment {
            text: current,
            kind,
            offset: start,
        });
    }

    segments
}

fn classify(ch: char, previous: Option<SegmentKind>) -> SegmentKind {
    if ch.is_alphanumeric() {
        SegmentKind::WordCandidate
    } else if previous == Some(SegmentKind::WordCandidate) && is_combining_mark(ch) {
        // Decomposed accents stay attached to their base letter.
        SegmentKind::WordCandidate
    } else {
        SegmentKind::Separator
    }
}

/// Distinct vocabulary words of a text, in order of first occurrence.
///
/// Stores use this when registering the words of a new or edited text so
/// that stored words line up with the keys the index is built from. Tokens
/// mixing letters with digits (`abc123`) are not registered: their letter-only
/// form never occurs in the text, so no token could match it.
pub fn vocabulary_words(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    segment(raw)
        .into_iter()
        .filter(Segment::is_word)
        .filter_map(|segment| {
            let word = strict_key(&segment.text);
            (!word.is_empty() && word == normalize(&segment.text)).then_some(word)
        })
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn text_without_letters_is_one_separator() {
        let segments = segment(" ... !? ");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Separator);
        assert_eq!(segments[0].text, " ... !? ");
    }

    #[test]
    fn splits_words_and_separators() {
        let segments = segment("Der Hund bellt.");
        assert_eq!(texts(&segments), vec!["Der", " ", "Hund", " ", "bellt", "."]);
        assert!(segments[2].is_word());
        assert!(!segments[5].is_word());
    }

    #[test]
    fn offsets_point_into_raw_text() {
        let segments = segment("Öl und Brot");
        let offsets: Vec<usize> = segments.iter().map(|s| s.offset).collect();
        // "Ö" is two bytes long.
        assert_eq!(offsets, vec![0, 3, 4, 7, 8]);
    }

    #[test]
    fn hyphens_are_removed_before_segmentation() {
        let segments = segment("die Zei-tung, bit\u{00AD}te");
        assert_eq!(texts(&segments), vec!["die", " ", "Zeitung", ", ", "bitte"]);
        assert_eq!(segments[2].offset, 4);
    }

    #[test]
    fn hyphen_only_text_is_empty() {
        assert!(segment("---").is_empty());
    }

    #[test]
    fn combining_marks_stay_in_word() {
        let segments = segment("cafe\u{301} noir");
        assert_eq!(segments[0].text, "cafe\u{301}");
        assert!(segments[0].is_word());
    }

    #[test]
    fn digits_are_word_candidates() {
        let segments = segment("im Jahr 1989.");
        assert_eq!(segments[4].text, "1989");
        assert!(segments[4].is_word());
    }

    #[test]
    fn segments_reconstruct_stripped_input() {
        let samples = [
            "",
            "plain",
            "  leading and trailing  ",
            "Straßen-bahn\nfährt — schnell!",
            "«Guillemets» and “quotes” (nested [brackets])",
            "Привет, мир! 123",
            "tab\tseparated\r\nlines",
            "-",
        ];
        for sample in samples {
            let segments = segment(sample);
            assert_eq!(joined(&segments), strip_hyphens(sample));
            assert!(segments.iter().all(|s| !s.text.is_empty()));
        }
    }

    #[test]
    fn kinds_alternate() {
        let segments = segment("a, b; c");
        for pair in segments.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn strip_hyphens_borrows_when_clean() {
        assert!(matches!(strip_hyphens("clean"), Cow::Borrowed(_)));
        assert_eq!(strip_hyphens("a-b"), "ab");
    }

    #[test]
    fn vocabulary_words_are_distinct_and_letter_only() {
        let words = vocabulary_words("Der Hund, der Hund! Jahr 2024 und abc123.");
        assert_eq!(words, vec!["Der", "Hund", "der", "Jahr", "und"]);
    }

    #[test]
    fn vocabulary_words_match_their_tokens() {
        let raw = "x2y Café cafe\u{301} 3D-Drucker";
        for word in vocabulary_words(raw) {
            assert!(
                segment(raw).iter().any(|s| normalize(&s.text) == word),
                "{word} has no matching token"
            );
        }
        assert!(!vocabulary_words("abc123 x2y").contains(&"xy".to_string()));
    }
}
