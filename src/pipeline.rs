//! Stage orchestration over a [`Table`].
//!
//! Stages always run in this order, each enabled or not at build time:
//!
//! 1. normalize, dropping rows whose text becomes empty or null
//! 2. row filters, in the order they were added
//! 3. synonym mapping of the text field
//! 4. keep-first deduplication on exact text
//! 5. annotators, sequentially in registration order
//!
//! A [`Pipeline`] is immutable once built and can process any number of
//! tables.

pub mod config;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::annotate::{Annotator, annotate_table};
use crate::data::Table;
use crate::error::Result;
use crate::filter::{KeywordFilter, ReadabilityFilter, RowFilter};
use crate::synonym::{SynonymMap, SynonymMapper};
use crate::text::normalize::normalize;
use crate::text::readability::{FleschKincaid, ReadabilityScorer};

pub use config::{FilterConfig, PipelineConfig, PipelineConfigBuilder};

/// Row count after one filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCount {
    pub stage: String,
    pub rows: usize,
}

/// Row counts through each stage of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub rows_in: usize,
    pub rows_after_normalize: Option<usize>,
    pub filters: Vec<StageCount>,
    pub duplicates_removed: usize,
    pub rows_out: usize,
    /// Sentinel values per annotation field.
    pub annotation_sentinels: BTreeMap<String, usize>,
}

impl PipelineReport {
    pub fn total_sentinels(&self) -> usize {
        self.annotation_sentinels.values().sum()
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows in: {}", self.rows_in)?;
        if let Some(n) = self.rows_after_normalize {
            writeln!(f, "after normalization: {n}")?;
        }
        for stage in &self.filters {
            writeln!(f, "after {}: {}", stage.stage, stage.rows)?;
        }
        writeln!(f, "duplicates removed: {}", self.duplicates_removed)?;
        for (field, count) in &self.annotation_sentinels {
            writeln!(f, "sentinel values in '{field}': {count}")?;
        }
        write!(f, "rows out: {}", self.rows_out)
    }
}

/// A processed table with its report.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: Table,
    pub report: PipelineReport,
}

enum FilterStage {
    Configured(FilterConfig),
    Custom(Arc<dyn RowFilter>),
}

/// Collects stages and runtime collaborators, then commits them into a [`Pipeline`].
pub struct PipelineBuilder {
    config: PipelineConfig,
    filters: Vec<FilterStage>,
    synonym_map: Option<SynonymMap>,
    scorer: Arc<dyn ReadabilityScorer>,
    annotators: Vec<Box<dyn Annotator>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::from_config(PipelineConfig::default())
    }

    pub fn from_config(config: PipelineConfig) -> Self {
        let filters = config
            .filters
            .iter()
            .cloned()
            .map(FilterStage::Configured)
            .collect();
        Self {
            config,
            filters,
            synonym_map: None,
            scorer: Arc::new(FleschKincaid::new()),
            annotators: Vec::new(),
        }
    }

    pub fn text_field(mut self, name: impl Into<String>) -> Self {
        self.config.text_field = name.into();
        self
    }

    pub fn normalize(mut self, enabled: bool) -> Self {
        self.config.normalize = enabled;
        self
    }

    /// Add a keyword filter; an empty list adds nothing.
    pub fn keyword_filter<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if !keywords.is_empty() {
            self.filters
                .push(FilterStage::Configured(FilterConfig::Keyword { keywords }));
        }
        self
    }

    pub fn readability_filter(mut self, max_grade: f64) -> Self {
        self.filters
            .push(FilterStage::Configured(FilterConfig::Readability { max_grade }));
        self
    }

    /// Add any [`RowFilter`] at this position in the filter order.
    pub fn filter(mut self, filter: Arc<dyn RowFilter>) -> Self {
        self.filters.push(FilterStage::Custom(filter));
        self
    }

    /// Scorer used by readability filters added through configuration.
    pub fn scorer(mut self, scorer: Arc<dyn ReadabilityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Use an in-memory map instead of loading `synonyms` from disk.
    pub fn synonym_map(mut self, map: SynonymMap) -> Self {
        self.synonym_map = Some(map);
        self
    }

    pub fn preserve_case(mut self, enabled: bool) -> Self {
        self.config.preserve_case = enabled;
        self
    }

    pub fn dedup(mut self, enabled: bool) -> Self {
        self.config.dedup = enabled;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    pub fn annotator(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.annotators.push(annotator);
        self
    }

    /// Resolve filters and load the synonym map.
    pub fn build(self) -> Result<Pipeline> {
        self.config.validate()?;

        let mut filters: Vec<Arc<dyn RowFilter>> = Vec::with_capacity(self.filters.len());
        for stage in self.filters {
            let filter: Arc<dyn RowFilter> = match stage {
                FilterStage::Configured(FilterConfig::Keyword { keywords }) => {
                    Arc::new(KeywordFilter::new(keywords)?)
                }
                FilterStage::Configured(FilterConfig::Readability { max_grade }) => Arc::new(
                    ReadabilityFilter::with_scorer(max_grade, Arc::clone(&self.scorer)),
                ),
                FilterStage::Custom(filter) => filter,
            };
            filters.push(filter);
        }

        let map = match (self.synonym_map, &self.config.synonyms) {
            (Some(map), _) => Some(map),
            (None, Some(path)) => Some(SynonymMap::load(path)?),
            (None, None) => None,
        };
        let mapper = map.map(|m| SynonymMapper::new(&m).preserve_case(self.config.preserve_case));

        Ok(Pipeline {
            text_field: self.config.text_field,
            normalize: self.config.normalize,
            filters,
            mapper,
            dedup: self.config.dedup,
            parallel: self.config.parallel,
            annotators: self.annotators,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A committed sequence of preparation stages.
pub struct Pipeline {
    text_field: String,
    normalize: bool,
    filters: Vec<Arc<dyn RowFilter>>,
    mapper: Option<SynonymMapper>,
    dedup: bool,
    parallel: bool,
    annotators: Vec<Box<dyn Annotator>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("text_field", &self.text_field)
            .field("normalize", &self.normalize)
            .field("filters", &self.filters)
            .field("mapper", &self.mapper.as_ref().map(SynonymMapper::len))
            .field("dedup", &self.dedup)
            .field("annotators", &self.annotators.len())
            .finish()
    }
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        PipelineBuilder::from_config(config.clone()).build()
    }

    pub fn text_field(&self) -> &str {
        &self.text_field
    }

    /// Rewrite every non-null text value of the text field with `f`.
    fn map_texts<F>(&self, table: Table, f: F) -> Table
    where
        F: Fn(&str) -> String + Send + Sync,
    {
        let values: Vec<Option<String>> = {
            let texts = table.text_values(&self.text_field);
            if self.parallel {
                texts.par_iter().map(|t| t.map(&f)).collect()
            } else {
                texts.iter().map(|t| t.map(&f)).collect()
            }
        };
        table.with_text_values(&self.text_field, values)
    }

    /// Run every enabled stage over `table`.
    pub fn process(&self, table: Table) -> Result<PipelineOutput> {
        table.require_column(&self.text_field)?;
        let field = self.text_field.as_str();
        let mut report = PipelineReport {
            rows_in: table.len(),
            ..Default::default()
        };
        info!("starting pipeline with {} rows", table.len());

        let mut table = table;
        if self.normalize {
            table = self.map_texts(table, normalize);
            let mask: Vec<bool> = table
                .text_values(field)
                .iter()
                .map(|t| t.is_some_and(|t| !t.trim().is_empty()))
                .collect();
            table = table.retain_mask(&mask);
            report.rows_after_normalize = Some(table.len());
            info!("after normalization: {} rows", table.len());
        }

        for filter in &self.filters {
            table = filter.apply(table, field, self.parallel)?;
            info!("after {}: {} rows", filter.name(), table.len());
            report.filters.push(StageCount {
                stage: filter.name(),
                rows: table.len(),
            });
        }

        if let Some(mapper) = &self.mapper {
            info!("applying synonym mapping ({} entries)", mapper.len());
            table = self.map_texts(table, |t| mapper.simplify(t).into_owned());
        }

        if self.dedup {
            let (deduped, removed) = table.dedup_by(field);
            table = deduped;
            report.duplicates_removed = removed;
            info!("removed {removed} duplicate rows, {} remaining", table.len());
        }

        for annotator in &self.annotators {
            let (annotated, _) = annotate_table(table, field, annotator.as_ref())?;
            table = annotated;
            for name in annotator.fields() {
                let count = table
                    .rows()
                    .iter()
                    .filter(|row| row.get(&name).is_some_and(|v| v.is_sentinel()))
                    .count();
                *report.annotation_sentinels.entry(name).or_default() += count;
            }
        }

        report.rows_out = table.len();
        info!("pipeline complete: {} rows", table.len());
        Ok(PipelineOutput { table, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataValue, Record};
    use crate::error::PrepError;

    fn texts(table: &Table) -> Vec<String> {
        table
            .text_values("text")
            .into_iter()
            .map(|t| t.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_missing_text_field_fails_fast() {
        let pipeline = Pipeline::builder().text_field("body").build().unwrap();
        let err = pipeline
            .process(Table::from_texts("text", ["x"]))
            .unwrap_err();
        assert!(matches!(err, PrepError::Configuration(_)));
    }

    #[test]
    fn test_normalize_drops_empty_and_null_rows() {
        let mut table = Table::from_texts("text", ["Hello!", "###", ""]);
        table.push(Record::new().with_field("text", DataValue::Null));
        let out = Pipeline::builder().build().unwrap().process(table).unwrap();
        assert_eq!(texts(&out.table), vec!["hello !"]);
        assert_eq!(out.report.rows_after_normalize, Some(1));
    }

    #[test]
    fn test_dedup_runs_after_mapping() {
        let map: SynonymMap = [("utilize", "use")].into_iter().collect();
        let table = Table::from_texts("text", ["we use it", "we utilize it", "other"]);
        let out = Pipeline::builder()
            .normalize(false)
            .synonym_map(map)
            .build()
            .unwrap()
            .process(table)
            .unwrap();
        assert_eq!(texts(&out.table), vec!["we use it", "other"]);
        assert_eq!(out.report.duplicates_removed, 1);
    }

    #[test]
    fn test_filters_run_in_added_order() {
        let scorer: Arc<dyn ReadabilityScorer> =
            Arc::new(|t: &str| Some(t.split_whitespace().count() as f64));
        let table = Table::from_texts(
            "text",
            ["moon", "moon and many other words", "sun"],
        );
        let out = Pipeline::builder()
            .normalize(false)
            .scorer(scorer)
            .keyword_filter(["moon"])
            .readability_filter(2.0)
            .build()
            .unwrap()
            .process(table)
            .unwrap();
        assert_eq!(texts(&out.table), vec!["moon"]);
        let stages: Vec<usize> = out.report.filters.iter().map(|s| s.rows).collect();
        assert_eq!(stages, vec![2, 1]);
    }

    #[test]
    fn test_other_columns_survive() {
        let table = Table::from_rows(
            ["text", "id"],
            vec![
                Record::new().with_text("text", "A b").with_field("id", 7),
                Record::new().with_text("text", "a B").with_field("id", 8),
            ],
        );
        let out = Pipeline::builder().build().unwrap().process(table).unwrap();
        assert_eq!(out.table.len(), 1);
        assert_eq!(
            out.table.rows()[0].get("id").and_then(DataValue::as_integer),
            Some(7)
        );
        assert_eq!(out.table.columns(), &["text".to_string(), "id".to_string()]);
    }
}
