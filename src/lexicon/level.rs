//! The six-level CEFR ordinal difficulty scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// A word difficulty level, easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

/// Ordinal difficulty rank; 0 is easiest.
pub type Rank = u8;

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn rank(self) -> Rank {
        self as Rank
    }

    pub fn from_rank(rank: Rank) -> Option<Self> {
        Self::ALL.get(rank as usize).copied()
    }

    /// Parse a level label, ignoring surrounding whitespace and case.
    ///
    /// Returns `None` for labels outside the scale.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "A1" => Some(CefrLevel::A1),
            "A2" => Some(CefrLevel::A2),
            "B1" => Some(CefrLevel::B1),
            "B2" => Some(CefrLevel::B2),
            "C1" => Some(CefrLevel::C1),
            "C2" => Some(CefrLevel::C2),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| PrepError::invalid_argument(format!("unknown level '{s}'")))
    }
}

/// Parse a comma-separated level list such as `"A1,A2"`.
pub fn parse_levels(list: &str) -> Result<Vec<CefrLevel>> {
    let levels = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(CefrLevel::from_str)
        .collect::<Result<Vec<_>>>()?;
    if levels.is_empty() {
        return Err(PrepError::invalid_argument(format!(
            "level list '{list}' is empty"
        )));
    }
    Ok(levels)
}

/// Highest rank among `levels`.
pub fn max_rank(levels: &[CefrLevel]) -> Option<Rank> {
    levels.iter().map(|l| l.rank()).max()
}

/// Lowest rank among `levels`.
pub fn min_rank(levels: &[CefrLevel]) -> Option<Rank> {
    levels.iter().map(|l| l.rank()).min()
}

/// Render a level list back to its comma-separated form.
pub fn join_levels(levels: &[CefrLevel]) -> String {
    levels
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
