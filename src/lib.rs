//! # tinyprep
//!
//! Corpus preparation for small-scale language-model pretraining.
//!
//! ## Features
//!
//! - CEFR-ranked synonym map construction from a leveled wordlist
//! - Case-preserving vocabulary simplification
//! - Text normalization to a restricted alphabet
//! - Readability and keyword filtering
//! - Keep-first deduplication
//! - Pluggable per-row annotators

// Core modules
pub mod annotate;
mod data;
mod error;
pub mod filter;
pub mod io;
pub mod lexicon;
pub mod pipeline;
pub mod stats;
pub mod synonym;
pub mod text;

// Re-exports for the public API
pub use annotate::{Annotator, FnAnnotator, TopicClassifier};
pub use data::{DataValue, Record, SENTINEL_PREFIX, Table};
pub use error::{PrepError, Result};
pub use filter::{KeywordFilter, ReadabilityFilter, RowFilter};
pub use lexicon::{BuildConfig, CefrLevel, DifficultyIndex, SynonymMapBuilder, Thesaurus};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineConfig, PipelineReport};
pub use stats::TableStats;
pub use synonym::{MapFormat, SynonymMap, SynonymMapper};
pub use text::{FleschKincaid, Normalizer, ReadabilityScorer, normalize};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
