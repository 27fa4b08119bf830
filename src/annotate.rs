//! Per-row metadata annotators.
//!
//! An [`Annotator`] turns one text into named values. Annotators run after
//! every other stage, sequentially and in registration order; a failing row
//! gets sentinel values (see [`DataValue::sentinel`]) instead of aborting the
//! run.

pub mod topic;

#[cfg(feature = "gemini")]
pub mod gemini;

use std::fmt;

use log::{info, warn};

use crate::data::{DataValue, Table};
use crate::error::Result;

pub use topic::{ALLOWED_TOPICS, CompletionBackend, EDUCATION_LEVELS, TopicClassifier};

#[cfg(feature = "gemini")]
pub use gemini::GeminiBackend;

/// Named values produced for one row.
pub type Annotation = Vec<(String, DataValue)>;

/// A capability that derives named fields from a text.
pub trait Annotator: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &str;

    /// The fields this annotator writes, in output column order.
    fn fields(&self) -> Vec<String>;

    fn annotate(&self, text: &str) -> Result<Annotation>;
}

/// Wraps a closure as an [`Annotator`].
pub struct FnAnnotator<F> {
    name: String,
    fields: Vec<String>,
    func: F,
}

impl<F> FnAnnotator<F>
where
    F: Fn(&str) -> Result<Annotation> + Send + Sync,
{
    pub fn new<I, S>(name: impl Into<String>, fields: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnAnnotator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAnnotator")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<F> Annotator for FnAnnotator<F>
where
    F: Fn(&str) -> Result<Annotation> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<String> {
        self.fields.clone()
    }

    fn annotate(&self, text: &str) -> Result<Annotation> {
        (self.func)(text)
    }
}

/// Declared fields first (null when absent), then any extras in emitted order.
fn order_fields(declared: &[String], mut annotation: Annotation) -> Annotation {
    let mut row = Annotation::with_capacity(declared.len().max(annotation.len()));
    for name in declared {
        let value = match annotation.iter().position(|(n, _)| n == name) {
            Some(i) => annotation.remove(i).1,
            None => DataValue::Null,
        };
        row.push((name.clone(), value));
    }
    row.extend(annotation);
    row
}

/// Sentinel written to every declared field when an annotator call fails.
pub const FAILURE_SENTINEL_KIND: &str = "Annotation";

/// Run `annotator` over every row of `field`, appending its columns.
///
/// Returns the table and the number of rows that carry at least one sentinel.
pub fn annotate_table(
    table: Table,
    field: &str,
    annotator: &dyn Annotator,
) -> Result<(Table, usize)> {
    table.require_column(field)?;
    let declared = annotator.fields();
    info!("applying annotator '{}' to {} rows", annotator.name(), table.len());

    let mut failed = 0usize;
    let mut values: Vec<Annotation> = Vec::with_capacity(table.len());
    for (row, text) in table.text_values(field).into_iter().enumerate() {
        let annotation = match annotator.annotate(text.unwrap_or_default()) {
            Ok(annotation) => annotation,
            Err(e) => {
                warn!("annotator '{}' failed on row {row}: {e}", annotator.name());
                declared
                    .iter()
                    .map(|name| (name.clone(), DataValue::sentinel(FAILURE_SENTINEL_KIND)))
                    .collect()
            }
        };
        if annotation.iter().any(|(_, v)| v.is_sentinel()) {
            failed += 1;
        }
        values.push(annotation);
    }

    let ordered: Vec<Annotation> = values
        .into_iter()
        .map(|annotation| order_fields(&declared, annotation))
        .collect();
    let table = table.append_columns(ordered);
    if failed > 0 {
        warn!(
            "annotator '{}' produced sentinel values for {failed} rows",
            annotator.name()
        );
    }
    Ok((table, failed))
}
