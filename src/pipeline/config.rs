use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// One row filter stage, in the order it should run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Keep rows containing any of `keywords` (case-insensitive).
    Keyword { keywords: Vec<String> },
    /// Keep rows with a readability grade at or below `max_grade`.
    Readability { max_grade: f64 },
}

/// Configuration for a preparation run.
///
/// Fixed before processing begins; [`crate::pipeline::Pipeline::from_config`]
/// resolves it once into a runnable pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name of the text column every stage reads.
    pub text_field: String,
    /// Normalize text and drop rows that become empty.
    pub normalize: bool,
    /// Filters, applied in order.
    pub filters: Vec<FilterConfig>,
    /// Persisted synonym map (`.json` or `.csv`).
    pub synonyms: Option<PathBuf>,
    pub preserve_case: bool,
    /// Keep only the first row per exact text.
    pub dedup: bool,
    /// Evaluate per-row transforms with rayon. Output order is unaffected.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_field: "text".to_string(),
            normalize: true,
            filters: Vec::new(),
            synonyms: None,
            preserve_case: true,
            dedup: true,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.text_field.trim().is_empty() {
            return Err(PrepError::configuration("text_field must not be empty"));
        }
        for filter in &self.filters {
            if let FilterConfig::Readability { max_grade } = filter {
                if max_grade.is_nan() {
                    return Err(PrepError::configuration("max_grade must be a number"));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn text_field(mut self, name: impl Into<String>) -> Self {
        self.config.text_field = name.into();
        self
    }

    pub fn normalize(mut self, enabled: bool) -> Self {
        self.config.normalize = enabled;
        self
    }

    pub fn keyword_filter<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if !keywords.is_empty() {
            self.config.filters.push(FilterConfig::Keyword { keywords });
        }
        self
    }

    pub fn readability_filter(mut self, max_grade: f64) -> Self {
        self.config
            .filters
            .push(FilterConfig::Readability { max_grade });
        self
    }

    pub fn synonyms(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.synonyms = Some(path.into());
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

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
