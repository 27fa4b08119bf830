//! Lexical database capability: word in, synonym sets out.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// A synonym with its usage-frequency count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lemma {
    /// Lemma name; underscores stand for spaces in multi-word lemmas.
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

impl Lemma {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// Lowercased display form with underscores turned into spaces.
    pub fn text(&self) -> String {
        self.name.replace('_', " ").to_lowercase()
    }
}

/// One sense of a word: the lemmas sharing that meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymSet {
    pub lemmas: Vec<Lemma>,
}

impl SynonymSet {
    pub fn new(lemmas: Vec<Lemma>) -> Self {
        Self { lemmas }
    }
}

/// Source of synonym sets, e.g. a WordNet-style database.
pub trait SynonymSource: Send + Sync {
    /// All synonym sets the word belongs to; empty when unknown.
    fn synsets(&self, word: &str) -> Vec<SynonymSet>;

    /// Name reported in build statistics.
    fn name(&self) -> &str {
        "lexical-database"
    }
}

/// An in-memory lexical database keyed by lowercased word.
///
/// The persisted form is a JSON document
/// `{ "word": [ [ {"name": "...", "count": 3}, ... ], ... ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thesaurus {
    entries: BTreeMap<String, Vec<SynonymSet>>,
}

impl Thesaurus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synonym set under `word`.
    pub fn insert(&mut self, word: &str, set: SynonymSet) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(set);
    }

    /// Builder-style variant of [`Thesaurus::insert`].
    pub fn with_set(mut self, word: &str, lemmas: &[(&str, u32)]) -> Self {
        let set = SynonymSet::new(lemmas.iter().map(|&(n, c)| Lemma::new(n, c)).collect());
        self.insert(word, set);
        self
    }

    /// Keys that differ only in case are merged in sorted key order.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: BTreeMap<String, Vec<SynonymSet>> = serde_json::from_reader(reader)
            .map_err(|e| PrepError::format(format!("malformed thesaurus document: {e}")))?;
        let mut thesaurus = Self::new();
        for (word, sets) in raw {
            for set in sets {
                thesaurus.insert(&word, set);
            }
        }
        Ok(thesaurus)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let thesaurus = Self::from_json_reader(BufReader::new(File::open(path)?))?;
        info!(
            "loaded thesaurus from {}: {} words",
            path.display(),
            thesaurus.len()
        );
        Ok(thesaurus)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynonymSource for Thesaurus {
    fn synsets(&self, word: &str) -> Vec<SynonymSet> {
        self.entries
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    fn name(&self) -> &str {
        "thesaurus"
    }
}
