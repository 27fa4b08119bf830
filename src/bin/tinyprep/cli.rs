use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// tinyprep - corpus preparation for small language models
#[derive(Parser)]
#[command(name = "tinyprep", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a CEFR-ranked synonym map from a leveled wordlist.
    BuildSynmap(BuildSynmapArgs),
    /// Normalize, filter, simplify and deduplicate a corpus.
    Prepare(PrepareArgs),
}

// --- build-synmap ---

#[derive(Args)]
pub struct BuildSynmapArgs {
    /// CSV wordlist with `headword` and `CEFR` columns.
    #[arg(long)]
    pub wordlist: PathBuf,

    /// Directory for the map, unmapped list and build statistics.
    #[arg(long)]
    pub out_dir: PathBuf,

    /// JSON thesaurus used as the lexical database.
    #[arg(long)]
    pub thesaurus: Option<PathBuf>,

    /// Comma-separated levels treated as easy.
    #[arg(long, default_value = "A1,A2")]
    pub easy_levels: String,

    /// Comma-separated levels treated as difficult.
    #[arg(long, default_value = "B2,C1,C2")]
    pub difficult_levels: String,

    /// Also treat B1 words as difficult.
    #[arg(long)]
    pub include_b1: bool,

    /// Allow multi-word replacements from the thesaurus.
    #[arg(long)]
    pub allow_multiword: bool,

    /// Only map purely alphabetic headwords (skips entries like `a.m.`).
    #[arg(long)]
    pub alpha_only: bool,
}

// --- prepare ---

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnnotatorKind {
    /// Topic and education level through the Gemini API.
    Gemini,
}

#[derive(Args)]
pub struct PrepareArgs {
    /// Input table (`.csv` or `.jsonl`).
    #[arg(long)]
    pub input: PathBuf,

    /// Output table (`.csv` or `.jsonl`).
    #[arg(long)]
    pub output: PathBuf,

    /// Pipeline configuration TOML; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Name of the text column [default: text].
    #[arg(long)]
    pub text_column: Option<String>,

    /// Synonym map (`.json` or `.csv`).
    #[arg(long)]
    pub synonyms: Option<PathBuf>,

    /// Comma-separated keywords; rows must contain at least one.
    #[arg(long, value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Maximum Flesch-Kincaid grade [default: 8 without --config].
    #[arg(long, conflicts_with = "no_max_grade")]
    pub max_grade: Option<f64>,

    /// Disable readability filtering.
    #[arg(long)]
    pub no_max_grade: bool,

    /// Skip text normalization.
    #[arg(long)]
    pub no_normalize: bool,

    /// Skip deduplication.
    #[arg(long)]
    pub no_dedup: bool,

    /// Emit replacements exactly as stored instead of matching case.
    #[arg(long)]
    pub no_preserve_case: bool,

    /// Don't write the statistics JSON.
    #[arg(long)]
    pub no_stats: bool,

    /// Add an annotator.
    #[arg(long, value_enum)]
    pub annotate: Option<AnnotatorKind>,

    /// API key for the annotator (falls back to GOOGLE_API_KEY).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Gemini model name.
    #[arg(long, default_value = "gemini-2.5-flash-lite")]
    pub gemini_model: String,
}
