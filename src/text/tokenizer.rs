//! Word/number/punctuation tokenization and best-effort detokenization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Letters with an optional apostrophe tail, digit runs, or one symbol.
    static ref TOKEN_RE: Regex = Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?|\d+|[^\w\s]").unwrap();
    static ref SPACE_BEFORE_PUNCT_RE: Regex = Regex::new(r"\s+([,.;:!?])").unwrap();
    static ref SPACE_AFTER_OPEN_RE: Regex = Regex::new(r#"([(\[{"'])\s+"#).unwrap();
    static ref SPACE_BEFORE_CLOSE_RE: Regex = Regex::new(r#"\s+([)\]}"'])"#).unwrap();
}

/// Contraction suffixes re-attached to the preceding token.
const CONTRACTIONS: [&str; 7] = ["n't", "'t", "'s", "'re", "'m", "'ve", "'d"];

/// Split `text` into words (with contractions), numbers and single symbols.
///
/// Whitespace separates tokens and is never itself a token.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Join tokens with single spaces, then repair spacing around punctuation.
///
/// Original spacing (runs of spaces, tabs) is not restored.
pub fn detokenize<S: AsRef<str>>(tokens: &[S]) -> String {
    let joined = tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let text = SPACE_BEFORE_PUNCT_RE.replace_all(&joined, "$1");
    let text = SPACE_AFTER_OPEN_RE.replace_all(&text, "$1");
    let mut text = SPACE_BEFORE_CLOSE_RE.replace_all(&text, "$1").into_owned();
    for suffix in CONTRACTIONS {
        text = text.replace(&format!(" {suffix}"), suffix);
    }
    text
}
