//! Construction of the difficult-word -> easy-word synonym map.
//!
//! Each word is resolved by an ordered list of [`ResolutionStrategy`]s and the
//! first one that answers wins:
//!
//! ```text
//! manual overrides -> lexical database -> heuristic stem -> unmapped
//! ```
//!
//! The result is a pure function of the wordlist, the lexical database, the
//! manual table and the thresholds, so two builds over the same inputs produce
//! the same map, provenance and unmapped list.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use ahash::AHashMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};
use crate::lexicon::candidate::CandidateSelector;
use crate::lexicon::difficulty::DifficultyIndex;
use crate::lexicon::level::{self, CefrLevel, Rank};
use crate::lexicon::manual::{MANUAL_OVERRIDES, ManualTable};
use crate::lexicon::source::SynonymSource;
use crate::lexicon::stem::heuristic_stem;
use crate::synonym::map::{MapFormat, SynonymMap};

/// Which strategy produced a mapping. Used for auditing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Manual,
    LexicalDatabase,
    HeuristicFallback,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Manual => "manual",
            Provenance::LexicalDatabase => "lexical-database",
            Provenance::HeuristicFallback => "heuristic-fallback",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds and switches for a map build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Levels whose words may be used as replacements.
    pub easy_levels: Vec<CefrLevel>,
    /// Levels whose words should be replaced.
    pub difficult_levels: Vec<CefrLevel>,
    /// Also treat B1 words as difficult.
    pub include_b1: bool,
    /// Accept multi-word replacements from the lexical database.
    pub allow_multiword: bool,
    /// Only map purely alphabetic headwords.
    pub alpha_only: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            easy_levels: vec![CefrLevel::A1, CefrLevel::A2],
            difficult_levels: vec![CefrLevel::B2, CefrLevel::C1, CefrLevel::C2],
            include_b1: false,
            allow_multiword: false,
            alpha_only: false,
        }
    }
}

impl BuildConfig {
    /// Difficult levels with B1 added when `include_b1` is set.
    pub fn effective_difficult_levels(&self) -> Vec<CefrLevel> {
        let mut levels = self.difficult_levels.clone();
        if self.include_b1 && !levels.contains(&CefrLevel::B1) {
            levels.push(CefrLevel::B1);
        }
        levels
    }
}

/// Shared, read-only inputs handed to every strategy.
pub struct ResolutionContext<'a> {
    pub index: &'a DifficultyIndex,
    pub easy_words: &'a AHashMap<String, Rank>,
    pub easy_ceiling: Rank,
    pub allow_multiword: bool,
}

/// One way of finding a replacement for a word.
pub trait ResolutionStrategy {
    fn provenance(&self) -> Provenance;

    /// A replacement for `word`, or `None` to defer to the next strategy.
    fn resolve(&self, word: &str, ctx: &ResolutionContext<'_>) -> Option<String>;
}

/// Curated pairs, accepted only when the source is indexed and the target is easy.
pub struct ManualStrategy {
    table: ManualTable,
}

impl ManualStrategy {
    pub fn new(table: ManualTable) -> Self {
        Self { table }
    }
}

impl ResolutionStrategy for ManualStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::Manual
    }

    fn resolve(&self, word: &str, ctx: &ResolutionContext<'_>) -> Option<String> {
        let target = self.table.get(word)?;
        (ctx.index.contains(word) && ctx.easy_words.contains_key(target))
            .then(|| target.to_string())
    }
}

/// Ranked synonym selection against a lexical database.
pub struct LexicalStrategy<'s> {
    source: &'s dyn SynonymSource,
}

impl<'s> LexicalStrategy<'s> {
    pub fn new(source: &'s dyn SynonymSource) -> Self {
        Self { source }
    }
}

impl ResolutionStrategy for LexicalStrategy<'_> {
    fn provenance(&self) -> Provenance {
        Provenance::LexicalDatabase
    }

    fn resolve(&self, word: &str, ctx: &ResolutionContext<'_>) -> Option<String> {
        CandidateSelector::new(ctx.easy_words, ctx.easy_ceiling)
            .allow_multiword(ctx.allow_multiword)
            .select(word, self.source)
    }
}

/// Suffix stripping, accepted only when the stem is itself an easy word.
pub struct HeuristicStrategy;

impl ResolutionStrategy for HeuristicStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::HeuristicFallback
    }

    fn resolve(&self, word: &str, ctx: &ResolutionContext<'_>) -> Option<String> {
        let stem = heuristic_stem(word);
        (stem != word && ctx.easy_words.contains_key(&stem)).then_some(stem)
    }
}

/// One line of the provenance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRow {
    pub from: String,
    pub to: String,
    pub source: Provenance,
    pub from_level: Option<CefrLevel>,
    pub to_level: Option<CefrLevel>,
}

/// Aggregate counts for a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildStats {
    pub total_targets: usize,
    /// Difficult targets that received a mapping.
    pub mapped: usize,
    pub unmapped: usize,
    /// Manual overrides for indexed words outside the difficult targets.
    pub non_target_manual: usize,
    pub by_provenance: BTreeMap<Provenance, usize>,
    pub lexical_database_used: bool,
    pub easy_levels: Vec<CefrLevel>,
    pub difficult_levels: Vec<CefrLevel>,
}

impl BuildStats {
    /// Mapped words as a percentage of difficult targets.
    pub fn mapped_percent(&self) -> f64 {
        if self.total_targets == 0 {
            0.0
        } else {
            self.mapped as f64 / self.total_targets as f64 * 100.0
        }
    }

    pub fn count(&self, provenance: Provenance) -> usize {
        self.by_provenance.get(&provenance).copied().unwrap_or(0)
    }

    /// Plain-text report, one fact per line.
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Total difficult targets: {}\n", self.total_targets));
        out.push_str(&format!(
            "Mapped: {} ({:.2}%)\n",
            self.mapped,
            self.mapped_percent()
        ));
        out.push_str(&format!("Unmapped: {}\n", self.unmapped));
        out.push_str(&format!(
            "Manual overrides outside targets: {}\n",
            self.non_target_manual
        ));
        for provenance in [
            Provenance::Manual,
            Provenance::LexicalDatabase,
            Provenance::HeuristicFallback,
        ] {
            out.push_str(&format!(
                "From {}: {}\n",
                provenance,
                self.count(provenance)
            ));
        }
        out.push_str(&format!(
            "Lexical database used: {}\n",
            self.lexical_database_used
        ));
        out.push_str(&format!(
            "Easy levels: {}\n",
            level::join_levels(&self.easy_levels)
        ));
        out.push_str(&format!(
            "Difficult levels: {}\n",
            level::join_levels(&self.difficult_levels)
        ));
        out
    }
}

/// Everything a build produces.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub map: SynonymMap,
    pub provenance: BTreeMap<String, Provenance>,
    pub rows: Vec<MappingRow>,
    pub unmapped: Vec<String>,
    pub stats: BuildStats,
}

impl BuildOutput {
    /// Write `synonyms.json`, `synonyms.csv`, `unmapped.txt` and `build_stats.txt`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        self.map
            .save(dir.join("synonyms.json"), MapFormat::KeyedDocument)?;

        let mut writer = csv::Writer::from_path(dir.join("synonyms.csv"))?;
        writer.write_record(["from", "to", "source", "from_cefr", "to_cefr"])?;
        for row in &self.rows {
            writer.write_record([
                row.from.as_str(),
                row.to.as_str(),
                row.source.as_str(),
                row.from_level.map(CefrLevel::as_str).unwrap_or(""),
                row.to_level.map(CefrLevel::as_str).unwrap_or(""),
            ])?;
        }
        writer.flush()?;

        let mut unmapped = fs::File::create(dir.join("unmapped.txt"))?;
        for word in &self.unmapped {
            writeln!(unmapped, "{word}")?;
        }

        fs::write(dir.join("build_stats.txt"), self.stats.to_report())?;
        info!("wrote synonym map artifacts to {}", dir.display());
        Ok(())
    }
}

/// Builds a [`SynonymMap`] from a difficulty index and optional lexical database.
pub struct SynonymMapBuilder<'a> {
    index: &'a DifficultyIndex,
    config: BuildConfig,
    manual: ManualTable,
    source: Option<&'a dyn SynonymSource>,
}

impl<'a> SynonymMapBuilder<'a> {
    pub fn new(index: &'a DifficultyIndex) -> Self {
        Self {
            index,
            config: BuildConfig::default(),
            manual: MANUAL_OVERRIDES,
            source: None,
        }
    }

    pub fn config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    pub fn manual_table(mut self, table: ManualTable) -> Self {
        self.manual = table;
        self
    }

    pub fn synonym_source(mut self, source: &'a dyn SynonymSource) -> Self {
        self.source = Some(source);
        self
    }

    /// The strategies in precedence order.
    fn strategies(&self) -> Vec<Box<dyn ResolutionStrategy + 'a>> {
        let mut strategies: Vec<Box<dyn ResolutionStrategy + 'a>> =
            vec![Box::new(ManualStrategy::new(self.manual))];
        if let Some(source) = self.source {
            strategies.push(Box::new(LexicalStrategy::new(source)));
        }
        strategies.push(Box::new(HeuristicStrategy));
        strategies
    }

    /// Headwords that should be replaced, sorted.
    fn difficult_targets(&self, difficult_levels: &[CefrLevel]) -> Vec<String> {
        self.index
            .sorted_entries()
            .into_iter()
            .map(|(word, _)| word)
            .filter(|word| *word != "a")
            .filter(|word| {
                !self.config.alpha_only || word.chars().all(|c| c.is_ascii_alphabetic())
            })
            .filter(|word| self.index.is_difficult(word, difficult_levels))
            .map(str::to_string)
            .collect()
    }

    pub fn build(&self) -> Result<BuildOutput> {
        let easy_levels = &self.config.easy_levels;
        let difficult_levels = self.config.effective_difficult_levels();
        let easy_ceiling = level::max_rank(easy_levels)
            .ok_or_else(|| PrepError::invalid_argument("easy level list is empty"))?;
        if difficult_levels.is_empty() {
            return Err(PrepError::invalid_argument("difficult level list is empty"));
        }

        let easy_words = self.index.easy_words(easy_ceiling);
        let targets = self.difficult_targets(&difficult_levels);
        info!(
            "{} easy words ({}), {} difficult targets ({})",
            easy_words.len(),
            level::join_levels(easy_levels),
            targets.len(),
            level::join_levels(&difficult_levels)
        );

        let target_set: BTreeSet<&str> = targets.iter().map(String::as_str).collect();
        let mut words: BTreeSet<&str> = target_set.clone();
        for (src, _) in self.manual.iter() {
            if self.index.contains(src) {
                words.insert(src);
            }
        }

        let ctx = ResolutionContext {
            index: self.index,
            easy_words: &easy_words,
            easy_ceiling,
            allow_multiword: self.config.allow_multiword,
        };
        let strategies = self.strategies();

        let mut map = SynonymMap::new();
        let mut provenance = BTreeMap::new();
        let mut by_provenance: BTreeMap<Provenance, usize> = BTreeMap::new();

        for word in words {
            let is_target = target_set.contains(word);
            for strategy in &strategies {
                // Only manual overrides reach words outside the difficult set.
                if !is_target && strategy.provenance() != Provenance::Manual {
                    continue;
                }
                let Some(replacement) = strategy.resolve(word, &ctx) else {
                    continue;
                };
                if map.insert(word, &replacement) {
                    provenance.insert(word.to_string(), strategy.provenance());
                    *by_provenance.entry(strategy.provenance()).or_default() += 1;
                    break;
                }
            }
        }

        for (provenance, count) in &by_provenance {
            debug!("{count} mappings from {provenance}");
        }

        let unmapped: Vec<String> = targets
            .iter()
            .filter(|w| !map.contains(w))
            .cloned()
            .collect();

        let rows = map
            .iter()
            .map(|(from, to)| MappingRow {
                from: from.to_string(),
                to: to.to_string(),
                source: provenance[from],
                from_level: self.index.level(from),
                to_level: self.index.level(to),
            })
            .collect();

        let mapped = targets.len() - unmapped.len();
        let stats = BuildStats {
            total_targets: targets.len(),
            mapped,
            unmapped: unmapped.len(),
            non_target_manual: map.len() - mapped,
            by_provenance,
            lexical_database_used: self.source.is_some(),
            easy_levels: easy_levels.clone(),
            difficult_levels,
        };
        info!(
            "mapped {}/{} ({:.1}%) difficult words",
            stats.mapped,
            stats.total_targets,
            stats.mapped_percent()
        );

        Ok(BuildOutput {
            map,
            provenance,
            rows,
            unmapped,
            stats,
        })
    }
}
