//! Reading a text, annotating a word and reviewing it.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::{Call, FakeStore};
use lexicon_core::{
    DisplayStatus, Outcome, Rating, ReadingView, ReviewSession, ReviewState, WordStatus,
};

fn hund_statuses(view: &ReadingView<FakeStore>) -> Vec<DisplayStatus> {
    view.annotated()
        .iter()
        .filter(|a| a.segment.text == "Hund")
        .map(|a| a.display_status)
        .collect()
}

/// Saving a meaning for one occurrence recolors every occurrence.
#[tokio::test]
async fn test_save_meaning_recolors_every_occurrence() {
    let store = FakeStore::new("Der Hund bellt. Hund!", &[(7, "Hund", WordStatus::New)]);
    let mut view = ReadingView::open(Arc::clone(&store), 1).await.unwrap();

    let annotated = view.annotated();
    let texts: Vec<&str> = annotated.iter().map(|a| a.segment.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Der", " ", "Hund", " ", "bellt", ". ", "Hund", "!"]
    );
    assert_eq!(hund_statuses(&view), vec![DisplayStatus::New; 2]);

    // Click the first occurrence.
    let clicked = annotated
        .iter()
        .find(|a| a.segment.text == "Hund")
        .unwrap();
    assert_eq!(clicked.vocabulary_ref, Some(7));
    view.select(&clicked.segment.text);
    view.set_draft("dog");

    assert_eq!(view.save_meaning().await.unwrap(), Outcome::Applied);
    assert!(store
        .calls()
        .contains(&Call::UpdateWordMeaning(7, "dog".to_string())));

    assert_eq!(view.index().lookup("Hund").unwrap().status, WordStatus::Seen);
    assert_eq!(hund_statuses(&view), vec![DisplayStatus::Seen; 2]);
    assert_eq!(view.status_counts().seen, 1);
}

/// Hyphenated words in the raw text still match their vocabulary entry.
#[tokio::test]
async fn test_hyphenated_text_matches_entry() {
    let store = FakeStore::new("Der Hun-\u{00AD}d bellt.", &[(7, "Hund", WordStatus::Seen)]);
    let view = ReadingView::open(Arc::clone(&store), 1).await.unwrap();

    assert_eq!(hund_statuses(&view), vec![DisplayStatus::Seen]);
}

/// A reading view and a review session share one store independently.
#[tokio::test]
async fn test_reading_and_review_run_side_by_side() {
    let store = FakeStore::new(
        "Der Hund bellt.",
        &[(7, "Hund", WordStatus::New), (8, "bellt", WordStatus::New)],
    );
    let mut view = ReadingView::open(Arc::clone(&store), 1).await.unwrap();
    let mut review = ReviewSession::new(Arc::clone(&store));

    review.load_next().await.unwrap();
    assert_eq!(review.state(), &ReviewState::Exhausted);

    view.select("Hund");
    view.set_draft("dog");
    let (saved, restarted) = tokio::join!(view.save_meaning(), review.restart());
    assert_eq!(saved.unwrap(), Outcome::Applied);
    assert_eq!(restarted.unwrap(), Outcome::Applied);

    // The fake scheduler keeps its own queue; the review is still exhausted.
    assert!(review.is_exhausted());
    assert_eq!(store.status_of(7), Some(WordStatus::Seen));
    assert!(review.rate(7, Rating::Good).await.is_err());
}
