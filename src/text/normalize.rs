//! Canonicalization of raw text to a restricted alphabet.
//!
//! Output contains only `a-z`, `0-9`, space, newline and `, . ! ?`, with each
//! punctuation mark standing alone between single spaces. Every step after the
//! first operates on that alphabet, so normalizing twice equals normalizing once.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anything outside the output alphabet, except the marks deleted outright.
    static ref DISALLOWED_RE: Regex = Regex::new(r#"[^a-z0-9 \n,.!?'"\-]+"#).unwrap();
    static ref HORIZONTAL_SPACE_RE: Regex = Regex::new(r"[ \t\r\x0C\x0B]+").unwrap();
    static ref PUNCT_SPACING_RE: Regex = Regex::new(r"\s*([,.!?])\s*").unwrap();
}

/// Unicode look-alikes folded to ASCII before filtering.
fn fold_punctuation(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        '\u{00A0}' => ' ',
        other => other,
    }
}

fn is_sentence_punct(c: char) -> bool {
    matches!(c, ',' | '.' | '!' | '?')
}

/// Collapse runs of the same punctuation mark: `!!!` -> `!`, `?!` is kept.
fn collapse_repeated_punct(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if is_sentence_punct(c) && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Normalize `text`; see the module docs for the output alphabet.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s: String = text.to_lowercase().chars().map(fold_punctuation).collect();
    let s = DISALLOWED_RE.replace_all(&s, " ");
    let s: String = s.chars().filter(|c| !matches!(c, '\'' | '"' | '-')).collect();
    let s = collapse_repeated_punct(&s);
    let s = HORIZONTAL_SPACE_RE.replace_all(&s, " ");
    let s = PUNCT_SPACING_RE.replace_all(&s, " $1 ");
    let s = HORIZONTAL_SPACE_RE.replace_all(&s, " ");
    s.trim().to_string()
}

/// Stateless normalizer, usable wherever a text transform is expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Normalizer
    }

    pub fn normalize(&self, text: &str) -> String {
        normalize(text)
    }

    /// Normalize each line, dropping lines that become empty.
    pub fn normalize_iter<I>(&self, lines: I) -> impl Iterator<Item = String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        lines
            .into_iter()
            .map(|line| normalize(line.as_ref()))
            .filter(|line| !line.is_empty())
    }
}
