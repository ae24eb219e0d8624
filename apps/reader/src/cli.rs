use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI parser for the `lexicon` binary.
#[derive(Debug, Parser)]
#[command(name = "lexicon", version, about = "Read foreign texts and review their vocabulary")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List texts with their word counts.
    Texts,
    /// Add a text from a file ("-" reads stdin).
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace the title and content of a text.
    Edit {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a text. Its words stay in the vocabulary.
    RemoveText { id: i64 },
    /// Print a text with vocabulary markers.
    Read { id: i64 },
    /// Save the meaning of a word as it appears in a text.
    Meaning {
        text_id: i64,
        word: String,
        meaning: String,
    },
    /// Mark a word of a text as known.
    Known {
        text_id: i64,
        word: String,
        /// Save this meaning first
        #[arg(long)]
        meaning: Option<String>,
    },
    /// List the whole vocabulary.
    Words,
    /// Delete a word from the vocabulary.
    DeleteWord { id: i64 },
    /// Review due words interactively.
    Review,
    /// Show or set the dictionary locale.
    Locale { code: Option<String> },
    /// Print dictionary links for a word.
    Links { word: String },
    /// Print a sync key holding the whole database.
    ExportKey,
    /// Replace the database with the content of a sync key.
    ImportKey { key: String },
}
