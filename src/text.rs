//! Text-level transforms: tokenization, normalization and readability.

pub mod normalize;
pub mod readability;
pub mod tokenizer;

pub use normalize::{Normalizer, normalize};
pub use readability::{FleschKincaid, ReadabilityScorer, count_syllables};
pub use tokenizer::{detokenize, tokenize};
