//! Case-preserving application of a synonym map to free text.

use std::borrow::Cow;

use ahash::AHashMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::synonym::map::SynonymMap;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").unwrap();
}

/// Case shape of a source token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePattern {
    /// Every cased character is uppercase: `UTILIZE`.
    Upper,
    /// Uppercase first character, lowercase remainder: `Utilize`.
    Capitalized,
    /// Lowercase, mixed, or uncased.
    Other,
}

/// Python-style `islower`/`isupper`: at least one cased char, all cased chars match.
fn all_cased_match(s: &str, upper: bool) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if !upper {
                return false;
            }
            cased = true;
        } else if c.is_lowercase() {
            if upper {
                return false;
            }
            cased = true;
        }
    }
    cased
}

impl CasePattern {
    pub fn classify(token: &str) -> Self {
        if all_cased_match(token, true) {
            return CasePattern::Upper;
        }
        let mut chars = token.chars();
        if let Some(first) = chars.next() {
            let rest = chars.as_str();
            if first.is_uppercase() && !rest.is_empty() && all_cased_match(rest, false) {
                return CasePattern::Capitalized;
            }
        }
        CasePattern::Other
    }

    /// Shape `replacement` like a token of this pattern.
    pub fn apply(self, replacement: &str) -> String {
        match self {
            CasePattern::Upper => replacement.to_uppercase(),
            CasePattern::Capitalized => replacement
                .split(' ')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            CasePattern::Other => replacement.to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Adjust `replacement` to mimic the case pattern of `source`.
pub fn preserve_case_like(source: &str, replacement: &str) -> String {
    CasePattern::classify(source).apply(replacement)
}

/// Rewrites words in text through an immutable [`SynonymMap`].
///
/// Only word runs are looked up; digits in isolation, punctuation and
/// whitespace pass through untouched.
#[derive(Debug, Clone)]
pub struct SynonymMapper {
    lookup: AHashMap<String, String>,
    preserve_case: bool,
}

impl SynonymMapper {
    pub fn new(map: &SynonymMap) -> Self {
        Self {
            lookup: map
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            preserve_case: true,
        }
    }

    pub fn preserve_case(mut self, preserve: bool) -> Self {
        self.preserve_case = preserve;
        self
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Replace every mapped word in `text`.
    pub fn simplify<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.lookup.is_empty() {
            return Cow::Borrowed(text);
        }
        WORD_RE.replace_all(text, |caps: &Captures<'_>| {
            let word = &caps[0];
            match self.lookup.get(&word.to_lowercase()) {
                Some(replacement) if self.preserve_case => preserve_case_like(word, replacement),
                Some(replacement) => replacement.clone(),
                None => word.to_string(),
            }
        })
    }

    pub fn simplify_iter<I>(&self, lines: I) -> impl Iterator<Item = String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        lines
            .into_iter()
            .map(move |line| self.simplify(line.as_ref()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> SynonymMapper {
        let map: SynonymMap = [("utilize", "use"), ("commence", "start"), ("purchase", "pay for")]
            .into_iter()
            .collect();
        SynonymMapper::new(&map)
    }

    #[test]
    fn test_case_preservation() {
        let mapper = mapper();
        assert_eq!(mapper.simplify("UTILIZE"), "USE");
        assert_eq!(mapper.simplify("Utilize"), "Use");
        assert_eq!(mapper.simplify("utilize"), "use");
        assert_eq!(mapper.simplify("uTiLiZe"), "use");
    }

    #[test]
    fn test_capitalized_multiword_replacement() {
        assert_eq!(mapper().simplify("Purchase it."), "Pay For it.");
    }

    #[test]
    fn test_case_preservation_off_emits_stored_form() {
        let mapper = mapper().preserve_case(false);
        assert_eq!(mapper.simplify("We COMMENCE now"), "We start now");
    }

    #[test]
    fn test_non_word_characters_untouched() {
        let text = "  Utilize: 42 tools,\tthen commence!! ";
        assert_eq!(mapper().simplify(text), "  Use: 42 tools,\tthen start!! ");
    }

    #[test]
    fn test_unmapped_words_are_identity() {
        let text = "Nothing here maps.";
        assert_eq!(mapper().simplify(text), text);
    }

    #[test]
    fn test_classify_patterns() {
        assert_eq!(CasePattern::classify("HELLO"), CasePattern::Upper);
        assert_eq!(CasePattern::classify("Hello"), CasePattern::Capitalized);
        assert_eq!(CasePattern::classify("hello"), CasePattern::Other);
        assert_eq!(CasePattern::classify("HeLLo"), CasePattern::Other);
        assert_eq!(CasePattern::classify("I"), CasePattern::Upper);
        assert_eq!(CasePattern::classify("x"), CasePattern::Other);
        assert_eq!(CasePattern::classify("123"), CasePattern::Other);
    }

    #[test]
    fn test_simplify_iter() {
        let out: Vec<String> = mapper().simplify_iter(["utilize it", "commence"]).collect();
        assert_eq!(out, vec!["use it", "start"]);
    }
}
