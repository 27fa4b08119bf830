//! Reading and writing tables on disk.
//!
//! The layout is chosen once from the file extension: `.csv` or
//! `.jsonl`/`.ndjson` (one JSON object per line).

use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::data::{DataValue, Record, Table};
use crate::error::{PrepError, Result};
use crate::stats::TableStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    JsonLines,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("jsonl") | Some("ndjson") => Ok(TableFormat::JsonLines),
            _ => Err(PrepError::format(format!(
                "unsupported table format: {}",
                path.display()
            ))),
        }
    }
}

fn json_to_value(value: serde_json::Value) -> DataValue {
    match value {
        serde_json::Value::Null => DataValue::Null,
        serde_json::Value::Bool(b) => DataValue::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => DataValue::Int64(i),
            None => n.as_f64().map_or(DataValue::Null, DataValue::Float64),
        },
        serde_json::Value::String(s) => DataValue::Text(s),
        nested => DataValue::Text(nested.to_string()),
    }
}

/// A JSON object with its keys in document order.
struct OrderedObject(Vec<(String, DataValue)>);

impl<'de> Deserialize<'de> for OrderedObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ObjectVisitor;

        impl<'de> Visitor<'de> for ObjectVisitor {
            type Value = OrderedObject;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                    fields.push((key, json_to_value(value)));
                }
                Ok(OrderedObject(fields))
            }
        }

        deserializer.deserialize_map(ObjectVisitor)
    }
}

/// A row serialized as an object in table column order.
struct RowView<'a> {
    columns: &'a [String],
    record: &'a Record,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(column, self.record.get_or_null(column))?;
        }
        map.end()
    }
}

/// Read CSV; every non-empty cell is text, empty cells are null.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(columns.clone());
    for record in rdr.records() {
        let record = record?;
        let mut row = Record::new();
        for (i, column) in columns.iter().enumerate() {
            let value = match record.get(i) {
                Some(cell) if !cell.is_empty() => DataValue::Text(cell.to_string()),
                _ => DataValue::Null,
            };
            row.fields.insert(column.clone(), value);
        }
        table.push(row);
    }
    Ok(table)
}

/// Read one JSON object per line; columns appear in first-seen order.
pub fn read_json_lines<R: Read>(reader: R) -> Result<Table> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Record> = Vec::new();
    for (n, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let OrderedObject(fields) = serde_json::from_str(&line)
            .map_err(|e| PrepError::format(format!("line {}: {e}", n + 1)))?;
        let mut row = Record::new();
        for (key, value) in fields {
            if !columns.contains(&key) {
                columns.push(key.clone());
            }
            row.fields.insert(key, value);
        }
        rows.push(row);
    }
    for row in &mut rows {
        for column in &columns {
            row.fields.entry(column.clone()).or_insert(DataValue::Null);
        }
    }
    Ok(Table::from_rows(columns, rows))
}

/// Read `path`, failing unless it has a `text_field` column.
pub fn read_table(path: impl AsRef<Path>, text_field: &str) -> Result<Table> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    let file = File::open(path)?;
    let table = match format {
        TableFormat::Csv => read_csv(file)?,
        TableFormat::JsonLines => read_json_lines(file)?,
    };
    table.require_column(text_field)?;
    info!(
        "loaded {} rows with columns {:?} from {}",
        table.len(),
        table.columns(),
        path.display()
    );
    Ok(table)
}

pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(
            table
                .columns()
                .iter()
                .map(|c| row.get(c).map(DataValue::to_cell).unwrap_or_default()),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json_lines<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for record in table.rows() {
        let view = RowView {
            columns: table.columns(),
            record,
        };
        serde_json::to_writer(&mut writer, &view)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write `table` to `path`, creating parent directories.
pub fn write_table(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    create_parent(path)?;
    let file = File::create(path)?;
    match format {
        TableFormat::Csv => write_csv(table, file)?,
        TableFormat::JsonLines => write_json_lines(table, file)?,
    }
    info!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// `out/corpus.csv` -> `out/corpus.json`.
pub fn stats_path_for(output: &Path) -> PathBuf {
    output.with_extension("json")
}

pub fn write_stats(stats: &TableStats, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, stats)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("a.NDJSON")).unwrap(),
            TableFormat::JsonLines
        );
        assert!(matches!(
            TableFormat::from_path(Path::new("a.parquet")),
            Err(PrepError::Format(_))
        ));
    }

    #[test]
    fn test_json_lines_keep_document_key_order() {
        let input = "{\"zeta\": 1, \"text\": \"hi\"}\n\n{\"text\": \"yo\", \"extra\": [1, 2]}\n";
        let table = read_json_lines(input.as_bytes()).unwrap();
        assert_eq!(table.columns(), &["zeta", "text", "extra"]);
        assert_eq!(table.rows()[0].get("extra"), Some(&DataValue::Null));
        assert_eq!(table.rows()[1].text("extra"), Some("[1,2]"));
        assert_eq!(
            table.rows()[0].get("zeta").and_then(DataValue::as_integer),
            Some(1)
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = read_json_lines("{\"text\": \"a\"}\nnot json\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PrepError::Format(ref m) if m.starts_with("line 2")));
    }

    #[test]
    fn test_csv_empty_cells_are_null() {
        let table = read_csv("text,topic\nhello,\n,Mathematics\n".as_bytes()).unwrap();
        assert_eq!(table.rows()[0].get("topic"), Some(&DataValue::Null));
        assert_eq!(table.rows()[1].text("topic"), Some("Mathematics"));
    }

    #[test]
    fn test_json_lines_written_in_column_order() {
        let table = Table::from_rows(
            ["text", "a"],
            vec![Record::new().with_text("text", "x").with_field("a", 2)],
        );
        let mut out = Vec::new();
        write_json_lines(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"text\":\"x\",\"a\":2}\n");
    }

    #[test]
    fn test_stats_path() {
        assert_eq!(
            stats_path_for(Path::new("out/corpus.csv")),
            PathBuf::from("out/corpus.json")
        );
    }
}
