//! Headword difficulty index built from a leveled wordlist.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ahash::AHashMap;
use log::{debug, info};

use crate::error::{PrepError, Result};
use crate::lexicon::level::{self, CefrLevel, Rank};

/// One raw wordlist row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistEntry {
    pub headword: String,
    pub level: String,
}

impl WordlistEntry {
    pub fn new(headword: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            headword: headword.into(),
            level: level.into(),
        }
    }
}

/// Maps a lowercased headword to the easiest rank it was listed at.
///
/// Built once; read-only afterward and safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct DifficultyIndex {
    ranks: AHashMap<String, Rank>,
}

impl DifficultyIndex {
    /// Build the index, keeping the minimum rank per headword.
    ///
    /// Entries with an empty headword or an unrecognized level are skipped.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = WordlistEntry>,
    {
        let mut ranks: AHashMap<String, Rank> = AHashMap::new();
        let mut skipped = 0usize;
        for entry in entries {
            let head = entry.headword.trim();
            let Some(level) = CefrLevel::parse(&entry.level) else {
                skipped += 1;
                continue;
            };
            if head.is_empty() {
                skipped += 1;
                continue;
            }
            let rank = level.rank();
            ranks
                .entry(head.to_lowercase())
                .and_modify(|prev| *prev = (*prev).min(rank))
                .or_insert(rank);
        }
        if skipped > 0 {
            debug!("skipped {skipped} wordlist rows with empty headword or unknown level");
        }
        Self { ranks }
    }

    /// Load from CSV with a `headword` column and a `CEFR` (or `level`) column.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let head_idx = headers.iter().position(|h| h == "headword");
        let level_idx = headers.iter().position(|h| h == "cefr" || h == "level");
        let (Some(head_idx), Some(level_idx)) = (head_idx, level_idx) else {
            return Err(PrepError::configuration(format!(
                "wordlist must have 'headword' and 'CEFR' columns; found {headers:?}"
            )));
        };

        let mut entries = Vec::new();
        for record in rdr.records() {
            let record = record?;
            entries.push(WordlistEntry::new(
                record.get(head_idx).unwrap_or_default(),
                record.get(level_idx).unwrap_or_default(),
            ));
        }
        Ok(Self::build(entries))
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let index = Self::from_csv_reader(File::open(path)?)?;
        info!(
            "loaded difficulty index from {}: {} headwords",
            path.display(),
            index.len()
        );
        Ok(index)
    }

    /// Case-insensitive rank lookup.
    pub fn rank(&self, word: &str) -> Option<Rank> {
        self.ranks.get(&word.to_lowercase()).copied()
    }

    pub fn level(&self, word: &str) -> Option<CefrLevel> {
        self.rank(word).and_then(CefrLevel::from_rank)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.rank(word).is_some()
    }

    /// True iff ranked at or below the hardest of `easy_levels`.
    pub fn is_easy(&self, word: &str, easy_levels: &[CefrLevel]) -> bool {
        match (self.rank(word), level::max_rank(easy_levels)) {
            (Some(rank), Some(ceiling)) => rank <= ceiling,
            _ => false,
        }
    }

    /// True iff ranked at or above the easiest of `difficult_levels`.
    pub fn is_difficult(&self, word: &str, difficult_levels: &[CefrLevel]) -> bool {
        match (self.rank(word), level::min_rank(difficult_levels)) {
            (Some(rank), Some(floor)) => rank >= floor,
            _ => false,
        }
    }

    /// The sub-table of headwords ranked at or below `max_rank`.
    pub fn easy_words(&self, max_rank: Rank) -> AHashMap<String, Rank> {
        self.ranks
            .iter()
            .filter(|&(_, &r)| r <= max_rank)
            .map(|(w, &r)| (w.clone(), r))
            .collect()
    }

    /// All headwords with their ranks, sorted by headword.
    pub fn sorted_entries(&self) -> Vec<(&str, Rank)> {
        let mut entries: Vec<(&str, Rank)> =
            self.ranks.iter().map(|(w, &r)| (w.as_str(), r)).collect();
        entries.sort_unstable();
        entries
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> DifficultyIndex {
        DifficultyIndex::build(vec![
            WordlistEntry::new("run", "B2"),
            WordlistEntry::new("Run", "A1"),
            WordlistEntry::new("utilize", "C1"),
            WordlistEntry::new("use", "A1"),
            WordlistEntry::new("big", "a2"),
            WordlistEntry::new("moreover", "B1"),
            WordlistEntry::new("mystery", "Z9"),
            WordlistEntry::new("  ", "A1"),
        ])
    }

    #[test]
    fn test_duplicate_headword_keeps_minimum_rank() {
        let index = index();
        assert_eq!(index.rank("run"), Some(CefrLevel::A1.rank()));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let index = index();
        assert_eq!(index.rank("UTILIZE"), Some(4));
        assert_eq!(index.level("Big"), Some(CefrLevel::A2));
    }

    #[test]
    fn test_unknown_levels_are_skipped() {
        let index = index();
        assert_eq!(index.rank("mystery"), None);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_easy_and_difficult_thresholds() {
        let index = index();
        let easy = [CefrLevel::A1, CefrLevel::A2];
        let difficult = [CefrLevel::B2, CefrLevel::C1, CefrLevel::C2];
        assert!(index.is_easy("big", &easy));
        assert!(!index.is_easy("moreover", &easy));
        assert!(index.is_difficult("utilize", &difficult));
        assert!(!index.is_difficult("moreover", &difficult));
        assert!(!index.is_easy("unknown", &easy));
        assert!(!index.is_difficult("unknown", &difficult));
    }

    #[test]
    fn test_csv_requires_headword_and_level_columns() {
        let csv = "word,level\nrun,A1\n";
        let err = DifficultyIndex::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PrepError::Configuration(_)));
    }

    #[test]
    fn test_csv_loading() {
        let csv = "headword,pos,CEFR\nrun,verb,B2\nrun,noun,A1\nutilize,verb,C1\nodd,adj,??\n";
        let index = DifficultyIndex::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(index.rank("run"), Some(0));
        assert_eq!(index.rank("utilize"), Some(4));
        assert!(!index.contains("odd"));
        let easy = index.easy_words(1);
        assert_eq!(easy.len(), 1);
        assert!(easy.contains_key("run"));
    }
}
