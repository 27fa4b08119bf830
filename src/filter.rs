//! Row predicates over the text field.
//!
//! A filter only decides whether to keep a row; it never rewrites it. Table
//! level application evaluates the predicate per row (optionally with rayon)
//! and keeps survivors in their original order.

use std::fmt;
use std::sync::Arc;

use aho_corasick::AhoCorasick;
use log::debug;
use rayon::prelude::*;

use crate::data::Table;
use crate::error::{PrepError, Result};
use crate::text::readability::{FleschKincaid, ReadabilityScorer};

/// A keep/drop predicate over a row's text.
pub trait RowFilter: Send + Sync + fmt::Debug {
    /// Short label used in logs and reports.
    fn name(&self) -> String;

    /// Whether a row whose text field holds `text` survives.
    fn keep(&self, text: Option<&str>) -> bool;

    /// Apply the predicate to `field` of every row, preserving row order.
    fn apply(&self, table: Table, field: &str, parallel: bool) -> Result<Table> {
        table.require_column(field)?;
        let mask: Vec<bool> = {
            let texts = table.text_values(field);
            if parallel {
                texts.par_iter().map(|text| self.keep(*text)).collect()
            } else {
                texts.iter().map(|text| self.keep(*text)).collect()
            }
        };
        let before = table.len();
        let table = table.retain_mask(&mask);
        debug!(
            "{}: kept {} of {} rows",
            self.name(),
            table.len(),
            before
        );
        Ok(table)
    }
}

/// Keeps rows containing at least one keyword, case-insensitively.
///
/// An empty keyword list keeps every row.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl KeywordFilter {
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let matcher = if keywords.is_empty() {
            None
        } else {
            let ac = AhoCorasick::new(&keywords).map_err(|e| {
                PrepError::invalid_argument(format!("cannot build keyword matcher: {e}"))
            })?;
            Some(ac)
        };
        Ok(Self { keywords, matcher })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether `text` contains any keyword.
    pub fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Some(ac) => ac.is_match(&text.to_lowercase()),
            None => true,
        }
    }
}

impl RowFilter for KeywordFilter {
    fn name(&self) -> String {
        format!("keyword filter ({} keywords)", self.keywords.len())
    }

    fn keep(&self, text: Option<&str>) -> bool {
        match text {
            Some(text) => self.matches(text),
            None => self.matcher.is_none(),
        }
    }
}

/// Keeps rows whose readability grade is at most `max_grade`.
///
/// Rows the scorer cannot grade are dropped whatever the threshold.
#[derive(Clone)]
pub struct ReadabilityFilter {
    max_grade: f64,
    scorer: Arc<dyn ReadabilityScorer>,
}

impl ReadabilityFilter {
    /// Grade with the default Flesch-Kincaid scorer.
    pub fn new(max_grade: f64) -> Self {
        Self::with_scorer(max_grade, Arc::new(FleschKincaid::new()))
    }

    pub fn with_scorer(max_grade: f64, scorer: Arc<dyn ReadabilityScorer>) -> Self {
        Self { max_grade, scorer }
    }

    pub fn max_grade(&self) -> f64 {
        self.max_grade
    }
}

impl fmt::Debug for ReadabilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadabilityFilter")
            .field("max_grade", &self.max_grade)
            .finish_non_exhaustive()
    }
}

impl RowFilter for ReadabilityFilter {
    fn name(&self) -> String {
        format!("readability filter (max grade {})", self.max_grade)
    }

    fn keep(&self, text: Option<&str>) -> bool {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return false;
        };
        match self.scorer.grade(text) {
            Ok(grade) => grade <= self.max_grade,
            Err(_) => false,
        }
    }
}
