//! Vocabulary difficulty and synonym-map construction.
//!
//! Data flows leaves first:
//!
//! ```text
//! DifficultyIndex -> CandidateSelector -> SynonymMapBuilder -> SynonymMap
//! ```
//!
//! # Module Structure
//!
//! - `level`: the six-level CEFR scale
//! - `difficulty`: headword -> rank index built from a leveled wordlist
//! - `source`: the lexical database capability and a JSON-backed thesaurus
//! - `candidate`: ranked selection of an easy synonym
//! - `stem`: suffix-stripping fallback
//! - `manual`: curated override pairs
//! - `builder`: ordered resolution strategies producing the map

pub mod builder;
pub mod candidate;
pub mod difficulty;
pub mod level;
pub mod manual;
pub mod source;
pub mod stem;

pub use builder::{BuildConfig, BuildOutput, BuildStats, Provenance, SynonymMapBuilder};
pub use candidate::{Candidate, CandidateSelector};
pub use difficulty::{DifficultyIndex, WordlistEntry};
pub use level::CefrLevel;
pub use manual::{MANUAL_OVERRIDES, ManualTable};
pub use source::{Lemma, SynonymSet, SynonymSource, Thesaurus};
pub use stem::heuristic_stem;
