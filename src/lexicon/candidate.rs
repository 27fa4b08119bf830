//! Ranked selection of an easy-vocabulary synonym.

use std::collections::HashSet;

use ahash::AHashMap;

use crate::lexicon::level::Rank;
use crate::lexicon::source::SynonymSource;

/// Sort key for a replacement candidate.
///
/// Field order is the comparison order: easiest rank, then higher frequency,
/// then shorter text, then lexical order of the text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Candidate {
    pub rank: Rank,
    pub neg_frequency: i64,
    pub length: usize,
    pub text: String,
}

impl Candidate {
    pub fn new(text: impl Into<String>, rank: Rank, frequency: u32) -> Self {
        let text = text.into();
        Self {
            rank,
            neg_frequency: -(frequency as i64),
            length: text.chars().count(),
            text,
        }
    }
}

/// Picks the best easy synonym for a difficult word.
#[derive(Debug, Clone)]
pub struct CandidateSelector<'a> {
    easy_words: &'a AHashMap<String, Rank>,
    ceiling: Rank,
    allow_multiword: bool,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(easy_words: &'a AHashMap<String, Rank>, ceiling: Rank) -> Self {
        Self {
            easy_words,
            ceiling,
            allow_multiword: false,
        }
    }

    pub fn allow_multiword(mut self, allow: bool) -> Self {
        self.allow_multiword = allow;
        self
    }

    /// Every eligible candidate for `word`, unsorted.
    pub fn candidates(&self, word: &str, source: &dyn SynonymSource) -> Vec<Candidate> {
        let original = word.to_lowercase();
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        for set in source.synsets(word) {
            for lemma in &set.lemmas {
                let text = lemma.text();
                if !self.allow_multiword && text.contains(char::is_whitespace) {
                    continue;
                }
                if text == original || !seen.insert(text.clone()) {
                    continue;
                }
                match self.easy_words.get(&text) {
                    Some(&rank) if rank <= self.ceiling => {
                        out.push(Candidate::new(text, rank, lemma.count));
                    }
                    _ => {}
                }
            }
        }
        out
    }

    /// The best candidate under the deterministic ordering, if any.
    pub fn select(&self, word: &str, source: &dyn SynonymSource) -> Option<String> {
        self.candidates(word, source)
            .into_iter()
            .min()
            .map(|c| c.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::source::Thesaurus;

    fn easy(words: &[(&str, Rank)]) -> AHashMap<String, Rank> {
        words.iter().map(|&(w, r)| (w.to_string(), r)).collect()
    }

    #[test]
    fn test_prefers_easiest_rank() {
        let table = easy(&[("help", 1), ("aid", 0)]);
        let source = Thesaurus::new().with_set("assist", &[("help", 50), ("aid", 1)]);
        let selector = CandidateSelector::new(&table, 1);
        assert_eq!(selector.select("assist", &source), Some("aid".to_string()));
    }

    #[test]
    fn test_tie_breaks_frequency_then_length_then_lexical() {
        let table = easy(&[("gain", 0), ("get", 0), ("win", 0), ("net", 0)]);
        let selector = CandidateSelector::new(&table, 1);

        // Equal rank: the more frequent candidate wins.
        let source = Thesaurus::new().with_set("obtain", &[("gain", 9), ("get", 3), ("win", 3)]);
        assert_eq!(selector.select("obtain", &source), Some("gain".to_string()));

        // Equal rank and frequency: the shorter candidate wins.
        let source = Thesaurus::new().with_set("obtain", &[("gain", 3), ("get", 3), ("win", 1)]);
        assert_eq!(selector.select("obtain", &source), Some("get".to_string()));

        // Fully tied: lexical order decides.
        let source = Thesaurus::new().with_set("obtain", &[("win", 3), ("net", 3), ("get", 3)]);
        assert_eq!(selector.select("obtain", &source), Some("get".to_string()));
    }

    #[test]
    fn test_excludes_self_hard_and_multiword() {
        let table = easy(&[("use", 0), ("make use of", 0), ("employ", 3)]);
        let source = Thesaurus::new().with_set(
            "Utilize",
            &[("utilize", 99), ("employ", 40), ("make_use_of", 30)],
        );
        let selector = CandidateSelector::new(&table, 1);
        assert_eq!(selector.select("Utilize", &source), None);

        let selector = selector.allow_multiword(true);
        assert_eq!(
            selector.select("Utilize", &source),
            Some("make use of".to_string())
        );
    }

    #[test]
    fn test_duplicate_lemmas_across_sets_counted_once() {
        let table = easy(&[("use", 0)]);
        let source = Thesaurus::new()
            .with_set("utilize", &[("Use", 1)])
            .with_set("utilize", &[("use", 7)]);
        let selector = CandidateSelector::new(&table, 1);
        let candidates = selector.candidates("utilize", &source);
        assert_eq!(candidates, vec![Candidate::new("use", 0, 1)]);
    }

    #[test]
    fn test_case_colliding_thesaurus_keys_select_consistently() {
        let doc = r#"{
            "Utilize": [[{"name": "use", "count": 1}]],
            "utilize": [[{"name": "use", "count": 9}, {"name": "get", "count": 5}]]
        }"#;
        let table = easy(&[("use", 0), ("get", 0)]);
        let selector = CandidateSelector::new(&table, 1);
        for _ in 0..50 {
            let source = Thesaurus::from_json_reader(doc.as_bytes()).unwrap();
            assert_eq!(selector.select("utilize", &source), Some("get".to_string()));
        }
    }

    #[test]
    fn test_no_synsets_yields_none() {
        let table = easy(&[("use", 0)]);
        let selector = CandidateSelector::new(&table, 1);
        assert_eq!(selector.select("utilize", &Thesaurus::new()), None);
    }
}
