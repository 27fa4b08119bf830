use std::collections::HashMap;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

static NULL: DataValue = DataValue::Null;

/// Prefix carried by every annotation sentinel value.
pub const SENTINEL_PREFIX: &str = "Error: ";

/// The value type for fields in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    /// String content, including the designated text field.
    Text(String),
}

impl DataValue {
    /// Build the sentinel marker written in place of a failed annotation.
    pub fn sentinel(kind: &str) -> Self {
        DataValue::Text(format!("{SENTINEL_PREFIX}{kind}"))
    }

    /// Returns the text value if this is a Text variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an Int64 variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DataValue::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a float for any numeric variant.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float64(f) => Some(*f),
            DataValue::Int64(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Bool variant.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Whether this value marks a failed annotation.
    pub fn is_sentinel(&self) -> bool {
        self.as_text()
            .is_some_and(|s| s.starts_with(SENTINEL_PREFIX))
    }

    /// Short type name used in statistics output.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "bool",
            DataValue::Int64(_) => "int64",
            DataValue::Float64(_) => "float64",
            DataValue::Text(_) => "text",
        }
    }

    /// Render the value as a flat string cell (empty for null).
    pub fn to_cell(&self) -> String {
        match self {
            DataValue::Null => String::new(),
            DataValue::Bool(b) => b.to_string(),
            DataValue::Int64(i) => i.to_string(),
            DataValue::Float64(f) => f.to_string(),
            DataValue::Text(s) => s.clone(),
        }
    }
}

// --- Conversions ---

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Text(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Text(v.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int64(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Int64(v as i64)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Float64(v)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Bool(v)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(DataValue::Null)
    }
}

/// A single row: a collection of named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: HashMap<String, DataValue>,
}

impl Record {
    /// Create a new empty record.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Add a field to the record.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add a text field.
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields.insert(name.into(), DataValue::Text(text.into()));
        self
    }

    /// Get a reference to a field's value.
    pub fn get(&self, name: &str) -> Option<&DataValue> {
        self.fields.get(name)
    }

    /// The field value, or null when the field is absent.
    pub fn get_or_null(&self, name: &str) -> &DataValue {
        self.fields.get(name).unwrap_or(&NULL)
    }

    /// Get a field as text. Null, missing and non-text fields yield `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(DataValue::as_text)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An ordered, row-oriented table.
///
/// Row order is insertion order and is meaningful: deduplication keeps the
/// first occurrence. Transformations consume the table and return a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Create an empty table with the given column order.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from existing rows.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Record>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        table.rows = rows;
        table
    }

    /// Convenience constructor for a single-column text table.
    pub fn from_texts<I, S>(column: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = texts
            .into_iter()
            .map(|t| Record::new().with_text(column, t))
            .collect();
        Self::from_rows([column], rows)
    }

    /// Append a row while building a table.
    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Fail with a configuration error unless `name` is a column.
    pub fn require_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(PrepError::configuration(format!(
                "column '{name}' not found; available columns: {:?}",
                self.columns
            )))
        }
    }

    /// Text of `field` for every row, in row order.
    pub fn text_values(&self, field: &str) -> Vec<Option<&str>> {
        self.rows.iter().map(|r| r.text(field)).collect()
    }

    /// Keep the rows whose mask entry is true.
    pub fn retain_mask(self, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), self.rows.len());
        let rows = self
            .rows
            .into_iter()
            .zip(mask)
            .filter_map(|(row, keep)| keep.then_some(row))
            .collect();
        Self {
            columns: self.columns,
            rows,
        }
    }

    /// Replace the text of `field` in every row.
    pub fn with_text_values(self, field: &str, values: Vec<Option<String>>) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());
        let rows = self
            .rows
            .into_iter()
            .zip(values)
            .map(|(mut row, value)| {
                row.fields.insert(field.to_string(), value.into());
                row
            })
            .collect();
        Self {
            columns: self.columns,
            rows,
        }
    }

    /// Keep the first row per exact value of `field`; returns the number dropped.
    pub fn dedup_by(self, field: &str) -> (Self, usize) {
        let before = self.rows.len();
        let mut seen: AHashSet<Option<String>> = AHashSet::with_capacity(before);
        let rows: Vec<Record> = self
            .rows
            .into_iter()
            .filter(|row| seen.insert(row.text(field).map(str::to_string)))
            .collect();
        let removed = before - rows.len();
        (
            Self {
                columns: self.columns,
                rows,
            },
            removed,
        )
    }

    /// Append per-row named values, adding new columns in first-seen order.
    ///
    /// Rows that lack a value for a new column receive null.
    pub fn append_columns(self, values: Vec<Vec<(String, DataValue)>>) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());
        let mut columns = self.columns;
        for pairs in &values {
            for (name, _) in pairs {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.clone());
                }
            }
        }
        let rows = self
            .rows
            .into_iter()
            .zip(values)
            .map(|(mut row, pairs)| {
                for (name, value) in pairs {
                    row.fields.insert(name, value);
                }
                for name in &columns {
                    row.fields
                        .entry(name.clone())
                        .or_insert(DataValue::Null);
                }
                row
            })
            .collect();
        Self { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_column_reports_available_columns() {
        let table = Table::from_texts("text", ["a"]);
        assert!(table.require_column("text").is_ok());
        let err = table.require_column("body").unwrap_err();
        assert!(matches!(err, PrepError::Configuration(_)));
        assert!(err.to_string().contains("body"));
    }

    #[test]
    fn test_dedup_keeps_first_in_order() {
        let table = Table::from_rows(
            ["text", "id"],
            vec![
                Record::new().with_text("text", "a").with_field("id", 1),
                Record::new().with_text("text", "b").with_field("id", 2),
                Record::new().with_text("text", "a").with_field("id", 3),
                Record::new().with_text("text", "c").with_field("id", 4),
            ],
        );
        let (deduped, removed) = table.dedup_by("text");
        assert_eq!(removed, 1);
        let ids: Vec<i64> = deduped
            .rows()
            .iter()
            .map(|r| r.get("id").and_then(DataValue::as_integer).unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_append_columns_fills_missing_with_null() {
        let table = Table::from_texts("text", ["x", "y"]);
        let table = table.append_columns(vec![
            vec![("topic".to_string(), DataValue::from("Mathematics"))],
            vec![],
        ]);
        assert_eq!(table.columns(), &["text".to_string(), "topic".to_string()]);
        assert_eq!(table.rows()[1].get("topic"), Some(&DataValue::Null));
    }

    #[test]
    fn test_sentinel_detection() {
        assert!(DataValue::sentinel("API Call").is_sentinel());
        assert!(!DataValue::from("Mathematics").is_sentinel());
        assert!(!DataValue::Null.is_sentinel());
    }

    #[test]
    fn test_retain_mask_preserves_order() {
        let table = Table::from_texts("text", ["a", "b", "c"]);
        let table = table.retain_mask(&[true, false, true]);
        assert_eq!(table.text_values("text"), vec![Some("a"), Some("c")]);
    }
}
