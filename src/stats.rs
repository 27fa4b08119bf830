//! Corpus statistics written beside a prepared table.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::{DataValue, Table};

const TOP_VALUES: usize = 10;

/// Length statistics of the text column, in characters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStats {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub mean_length: Option<f64>,
    pub median_length: Option<f64>,
    pub total_characters: usize,
    pub empty_or_null_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Statistics of a non-text column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub dtype: String,
    pub null_count: usize,
    /// Annotation sentinel values (`Error: ...`).
    pub sentinel_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_values: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_values: Option<Vec<ValueCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableStats {
    pub generated_at: DateTime<Utc>,
    pub total_rows: usize,
    pub total_columns: usize,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_stats: Option<TextStats>,
    pub column_stats: BTreeMap<String, ColumnStats>,
}

fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    Some(if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Column type from its non-null values; ints widen to float when mixed.
fn column_dtype<'a>(values: impl Iterator<Item = &'a DataValue>) -> &'static str {
    let mut dtype: Option<&'static str> = None;
    for value in values.filter(|v| !v.is_null()) {
        let name = value.type_name();
        dtype = Some(match dtype {
            None => name,
            Some(d) if d == name => d,
            Some("int64") | Some("float64") if matches!(name, "int64" | "float64") => "float64",
            Some(_) => "mixed",
        });
    }
    dtype.unwrap_or("null")
}

impl TextStats {
    fn compute(table: &Table, field: &str) -> Self {
        let texts = table.text_values(field);
        let mut lengths: Vec<usize> = texts
            .iter()
            .flatten()
            .map(|t| t.chars().count())
            .collect();
        lengths.sort_unstable();
        let as_float: Vec<f64> = lengths.iter().map(|&l| l as f64).collect();
        Self {
            min_length: lengths.first().copied(),
            max_length: lengths.last().copied(),
            mean_length: mean(&as_float),
            median_length: median(&as_float),
            total_characters: lengths.iter().sum(),
            empty_or_null_count: texts
                .iter()
                .filter(|t| t.is_none_or(|t| t.trim().is_empty()))
                .count(),
        }
    }
}

impl ColumnStats {
    fn compute(table: &Table, column: &str) -> Self {
        let values: Vec<&DataValue> = table
            .rows()
            .iter()
            .map(|row| row.get_or_null(column))
            .collect();
        let dtype = column_dtype(values.iter().copied());
        let mut stats = Self {
            dtype: dtype.to_string(),
            null_count: values.iter().filter(|v| v.is_null()).count(),
            sentinel_count: values.iter().filter(|v| v.is_sentinel()).count(),
            unique_values: None,
            top_values: None,
            min: None,
            max: None,
            mean: None,
            median: None,
        };

        match dtype {
            "text" => {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for text in values.iter().filter_map(|v| v.as_text()) {
                    *counts.entry(text).or_default() += 1;
                }
                let mut top: Vec<ValueCount> = counts
                    .iter()
                    .map(|(value, &count)| ValueCount {
                        value: value.to_string(),
                        count,
                    })
                    .collect();
                top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
                top.truncate(TOP_VALUES);
                stats.unique_values = Some(counts.len());
                stats.top_values = Some(top);
            }
            "int64" | "float64" => {
                let mut numbers: Vec<f64> = values.iter().filter_map(|v| v.as_float()).collect();
                numbers.sort_by(f64::total_cmp);
                stats.min = numbers.first().copied();
                stats.max = numbers.last().copied();
                stats.mean = mean(&numbers);
                stats.median = median(&numbers);
            }
            _ => {}
        }
        stats
    }
}

impl TableStats {
    /// Statistics of `table`, with `text_field` summarized by length.
    pub fn compute(table: &Table, text_field: &str) -> Self {
        let text_stats = table
            .has_column(text_field)
            .then(|| TextStats::compute(table, text_field));
        let column_stats = table
            .columns()
            .iter()
            .filter(|c| c.as_str() != text_field)
            .map(|c| (c.clone(), ColumnStats::compute(table, c)))
            .collect();
        Self {
            generated_at: Utc::now(),
            total_rows: table.len(),
            total_columns: table.columns().len(),
            columns: table.columns().to_vec(),
            text_stats,
            column_stats,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn sample() -> Table {
        Table::from_rows(
            ["text", "score", "topic"],
            vec![
                Record::new()
                    .with_text("text", "abcd")
                    .with_field("score", 1)
                    .with_field("topic", "Mathematics"),
                Record::new()
                    .with_text("text", "ab")
                    .with_field("score", 2.5)
                    .with_field("topic", DataValue::sentinel("API Call")),
                Record::new()
                    .with_text("text", "  ")
                    .with_field("score", DataValue::Null)
                    .with_field("topic", "Mathematics"),
            ],
        )
    }

    #[test]
    fn test_text_length_stats() {
        let stats = TableStats::compute(&sample(), "text");
        let text = stats.text_stats.unwrap();
        assert_eq!(text.min_length, Some(2));
        assert_eq!(text.max_length, Some(4));
        assert_eq!(text.median_length, Some(2.0));
        assert_eq!(text.total_characters, 8);
        assert_eq!(text.empty_or_null_count, 1);
    }

    #[test]
    fn test_numeric_and_text_columns() {
        let stats = TableStats::compute(&sample(), "text");
        let score = &stats.column_stats["score"];
        assert_eq!(score.dtype, "float64");
        assert_eq!(score.null_count, 1);
        assert_eq!(score.median, Some(1.75));

        let topic = &stats.column_stats["topic"];
        assert_eq!(topic.dtype, "text");
        assert_eq!(topic.sentinel_count, 1);
        assert_eq!(topic.unique_values, Some(2));
        let top = topic.top_values.as_ref().unwrap();
        assert_eq!(top[0].value, "Mathematics");
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn test_serializes_without_text_stats_for_missing_field() {
        let stats = TableStats::compute(&Table::from_texts("body", ["x"]), "text");
        let json = stats.to_json_pretty().unwrap();
        assert!(!json.contains("text_stats"));
        assert!(json.contains("generated_at"));
    }
}
