//! Synonym maps and their application to text.
//!
//! - `map`: the persisted word -> word map and its two on-disk formats
//! - `mapper`: case-preserving rewriting of free text through a map

pub mod map;
pub mod mapper;

pub use map::{MapFormat, SynonymMap};
pub use mapper::{CasePattern, SynonymMapper, preserve_case_like};
