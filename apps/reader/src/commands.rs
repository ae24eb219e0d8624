//! Command handlers.

use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use lexicon_core::links::{dictionary_link, is_supported_locale, supported_locales};
use lexicon_core::{
    DictionaryProvider, Outcome, Rating, ReadingView, ReviewSession, ReviewState, SkipReason,
    VocabularyEntry, VocabularyStore, WordStatus,
};
use lexicon_reader_lib::db::{PreferenceRepository, TextRepository};
use lexicon_reader_lib::render::render_annotated;
use lexicon_reader_lib::{
    apply_sync_key, generate_sync_key, LocalStore, ReaderConfig, RetentionScheduler,
};

use crate::cli::Commands;

pub async fn dispatch(
    command: Commands,
    store: Arc<LocalStore>,
    config: &ReaderConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Texts => list_texts(&store),
        Commands::Add { title, file } => {
            let content = read_content(&file)?;
            let text = store.repository()?.create_text(&title, &content)?;
            println!("Added text {} ({})", text.id, text.title);
            Ok(())
        }
        Commands::Edit { id, title, file } => {
            let content = read_content(&file)?;
            store.repository()?.update_text(id, &title, &content)?;
            println!("Updated text {id}");
            Ok(())
        }
        Commands::RemoveText { id } => {
            store.repository()?.delete_text(id)?;
            println!("Removed text {id}");
            Ok(())
        }
        Commands::Read { id } => read_text(store, id).await,
        Commands::Meaning {
            text_id,
            word,
            meaning,
        } => {
            let mut view = ReadingView::open(store, text_id).await?;
            view.select(&word);
            view.set_draft(meaning);
            let outcome = view.save_meaning().await?;
            report(outcome, &word, "Saved meaning of")
        }
        Commands::Known {
            text_id,
            word,
            meaning,
        } => {
            let mut view = ReadingView::open(store, text_id).await?;
            view.select(&word);
            if let Some(meaning) = meaning {
                view.set_draft(meaning);
            }
            let outcome = view.mark_known().await?;
            report(outcome, &word, "Marked as known:")
        }
        Commands::Words => list_words(&store).await,
        Commands::DeleteWord { id } => {
            store.delete_word(id).await?;
            println!("Deleted word {id}");
            Ok(())
        }
        Commands::Review => review(store).await,
        Commands::Locale { code } => locale(&store, config, code),
        Commands::Links { word } => {
            let locale = effective_locale(&store, config)?;
            for provider in DictionaryProvider::ALL {
                println!(
                    "{:<11} {}",
                    provider.name(),
                    dictionary_link(locale.as_deref(), provider, &word)
                );
            }
            Ok(())
        }
        Commands::ExportKey => {
            let key = generate_sync_key(&*store.repository()?)?;
            println!("{key}");
            Ok(())
        }
        Commands::ImportKey { key } => {
            let export = apply_sync_key(&*store.repository()?, &key)?;
            println!(
                "Imported {} text(s) and {} word(s)",
                export.texts.len(),
                export.words.len()
            );
            Ok(())
        }
    }
}

fn read_content(path: &Path) -> anyhow::Result<String> {
    let mut content = String::new();
    if path.as_os_str() == "-" {
        io::stdin()
            .read_to_string(&mut content)
            .context("failed to read text from stdin")?;
    } else {
        content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
    }
    if content.trim().is_empty() {
        bail!("text is empty");
    }
    Ok(content)
}

fn list_texts(store: &LocalStore) -> anyhow::Result<()> {
    let repo = store.repository()?;
    let texts = repo.list_texts()?;
    if texts.is_empty() {
        println!("No texts yet. Add one with `lexicon add --title <title> --file <path>`.");
        return Ok(());
    }
    for text in texts {
        let counts = repo.get_text_word_counts(text.id)?;
        println!(
            "{:>4}  {:<40} new {:>4}  seen {:>4}  known {:>4}",
            text.id, text.title, counts.new, counts.seen, counts.known
        );
    }
    Ok(())
}

async fn read_text(store: Arc<LocalStore>, id: i64) -> anyhow::Result<()> {
    let view = ReadingView::open(store, id).await?;
    let counts = view.status_counts();

    println!("{}\n", view.text().title);
    println!("{}\n", render_annotated(&view.annotated()));
    println!(
        "[new] {}   {{seen}} {}   known {}",
        counts.new, counts.seen, counts.known
    );
    Ok(())
}

fn report(outcome: Outcome, word: &str, applied: &str) -> anyhow::Result<()> {
    match outcome {
        Outcome::Applied => println!("{applied} {word}"),
        Outcome::Skipped(SkipReason::NoMatchingEntry) => {
            bail!("{word:?} is not in the vocabulary of this text")
        }
        Outcome::Skipped(SkipReason::NoSelection) => bail!("{word:?} is not a word"),
        Outcome::Skipped(SkipReason::BlankDraft) => bail!("meaning is empty"),
        Outcome::Discarded => println!("Cancelled"),
    }
    Ok(())
}

async fn list_words(store: &LocalStore) -> anyhow::Result<()> {
    let words = store.fetch_all_words().await?;
    let now = Utc::now();
    for word in words {
        println!(
            "{:>5}  {:<6} {:>4}  {:<24} {}",
            word.id,
            word.status.as_str(),
            retention_label(&word, now),
            word.word,
            word.meaning().unwrap_or("")
        );
    }
    Ok(())
}

/// Estimated recall of a reviewed word, as a percentage.
fn retention_label(word: &VocabularyEntry, now: DateTime<Utc>) -> String {
    match (word.status, word.last_review_date) {
        (WordStatus::Seen, Some(last)) => {
            let retention =
                RetentionScheduler::estimate_retention(word.stability, Some(last), now);
            format!("{:.0}%", retention * 100.0)
        }
        _ => "-".to_string(),
    }
}

fn effective_locale(store: &LocalStore, config: &ReaderConfig) -> anyhow::Result<Option<String>> {
    match &config.locale {
        Some(locale) => Ok(Some(locale.clone())),
        None => Ok(store.repository()?.get_locale()?),
    }
}

fn locale(store: &LocalStore, config: &ReaderConfig, code: Option<String>) -> anyhow::Result<()> {
    match code {
        Some(code) => {
            let code = code.trim().to_ascii_lowercase();
            if !is_supported_locale(&code) {
                let supported: Vec<&str> = supported_locales().collect();
                bail!(
                    "unsupported locale {code:?}, expected one of {}",
                    supported.join(", ")
                );
            }
            store.repository()?.save_locale(&code)?;
            println!("Locale set to {code}");
        }
        None => match effective_locale(store, config)? {
            Some(locale) => println!("{locale}"),
            None => println!("No locale set"),
        },
    }
    Ok(())
}

fn parse_rating(input: &str) -> Option<Rating> {
    match input {
        "1" => Some(Rating::Again),
        "2" => Some(Rating::Hard),
        "3" => Some(Rating::Good),
        "4" => Some(Rating::Easy),
        other => Rating::from_str(other),
    }
}

fn prompt(message: &str) -> io::Result<()> {
    print!("{message}");
    io::stdout().flush()
}

async fn review(store: Arc<LocalStore>) -> anyhow::Result<()> {
    let mut session = ReviewSession::new(store);
    session.load_next().await?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if session.state() == &ReviewState::Loading {
            session.load_next().await?;
            continue;
        }
        let Some(item) = session.current_item().cloned() else {
            println!("No words are due for review.");
            break;
        };

        if !session.is_answer_visible() {
            println!("\n{}", item.word);
            prompt("Enter to show the meaning, q to quit: ")?;
            let Some(line) = lines.next() else { break };
            if line?.trim() == "q" {
                break;
            }
            session.reveal_answer()?;
        }

        println!("  {}", item.meaning.as_deref().unwrap_or("(no meaning)"));
        prompt("[1] Again  [2] Hard  [3] Good  [4] Easy  q to quit: ")?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input == "q" {
            break;
        }
        let Some(rating) = parse_rating(input) else {
            println!("Unknown rating {input:?}");
            continue;
        };

        if let Err(err) = session.rate(item.id, rating).await {
            if !err.is_external() {
                return Err(err.into());
            }
            // The session kept its state; the word can be rated again.
            eprintln!("{err}");
        }
    }

    println!("Reviewed {} word(s).", session.reviews_submitted());
    session.close();
    Ok(())
}
