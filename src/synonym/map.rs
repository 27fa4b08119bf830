//! The persisted word -> word synonym map.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{PrepError, Result};

/// On-disk layout of a synonym map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    /// A flat JSON object `{ "from": "to", ... }`.
    KeyedDocument,
    /// A CSV table with `from`/`to` header fields.
    TwoColumnTable,
}

impl MapFormat {
    /// Resolve the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(MapFormat::KeyedDocument),
            Some("csv") => Ok(MapFormat::TwoColumnTable),
            _ => Err(PrepError::format(format!(
                "unsupported mapping format: {}",
                path.display()
            ))),
        }
    }
}

/// Lowercased source word -> lowercased replacement.
///
/// Keys are unique and a word never maps to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymMap {
    entries: BTreeMap<String, String>,
}

fn normalize_token(token: &str) -> String {
    token.trim().to_lowercase()
}

impl SynonymMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair after normalizing both sides.
    ///
    /// Returns false, leaving the map untouched, for empty sides or self-mappings.
    pub fn insert(&mut self, from: &str, to: &str) -> bool {
        let from = normalize_token(from);
        let to = normalize_token(to);
        if from.is_empty() || to.is_empty() || from == to {
            return false;
        }
        self.entries.insert(from, to);
        true
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a flat JSON object of string to string.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_reader(reader)
            .map_err(|e| PrepError::format(format!("malformed keyed mapping document: {e}")))?;
        Ok(raw.iter().collect())
    }

    /// Load from a CSV table.
    ///
    /// The first row is always a header. `from`/`to` columns are located by
    /// name; without them the first two columns are used positionally.
    /// Short rows, empty cells and self-mappings are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let header: Vec<String> = rdr.headers()?.iter().map(normalize_token).collect();
        if header.is_empty() || header.iter().all(String::is_empty) {
            return Ok(Self::new());
        }

        let named = (
            header.iter().position(|h| h == "from"),
            header.iter().position(|h| h == "to"),
        );
        let (i_from, i_to) = match named {
            (Some(f), Some(t)) => (f, t),
            _ if header.len() >= 2 => (0, 1),
            _ => {
                return Err(PrepError::configuration(format!(
                    "mapping table needs 'from' and 'to' columns or at least two columns; found {header:?}"
                )));
            }
        };

        let mut map = Self::new();
        for record in rdr.records() {
            let record = record?;
            if let (Some(from), Some(to)) = (record.get(i_from), record.get(i_to)) {
                map.insert(from, to);
            }
        }
        Ok(map)
    }

    /// Load from `path`, resolving the format once from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = MapFormat::from_path(path)?;
        let reader = BufReader::new(File::open(path)?);
        let map = match format {
            MapFormat::KeyedDocument => Self::from_json_reader(reader)?,
            MapFormat::TwoColumnTable => Self::from_csv_reader(reader)?,
        };
        info!("loaded {} synonym mappings from {}", map.len(), path.display());
        Ok(map)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.entries)?;
        Ok(())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["from", "to"])?;
        for (from, to) in self.iter() {
            wtr.write_record([from, to])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>, format: MapFormat) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        match format {
            MapFormat::KeyedDocument => self.write_json(file),
            MapFormat::TwoColumnTable => self.write_csv(file),
        }
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for SynonymMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k.as_ref(), v.as_ref());
        }
        map
    }
}
