//! Error types for tinyprep.
//!
//! Structural problems (missing columns, unreadable mapping files) surface as
//! [`PrepError::Configuration`] or [`PrepError::Format`] and abort a run before
//! any row is processed. Row-level problems ([`PrepError::ScoreUnavailable`],
//! [`PrepError::Annotation`]) are recovered from locally by the stage that
//! raised them.

use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, PrepError>;

/// The error taxonomy for corpus preparation.
#[derive(Error, Debug)]
pub enum PrepError {
    /// A required field or column is missing from an input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A persisted file is in an unsupported or malformed format.
    #[error("format error: {0}")]
    Format(String),

    /// The readability scorer could not produce a grade.
    #[error("score unavailable: {0}")]
    ScoreUnavailable(String),

    /// An annotator failed or produced a value outside its vocabulary.
    #[error("annotation failure: {0}")]
    Annotation(String),

    /// A caller supplied an argument that cannot be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl PrepError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        PrepError::Configuration(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        PrepError::Format(msg.into())
    }

    pub fn score_unavailable(msg: impl Into<String>) -> Self {
        PrepError::ScoreUnavailable(msg.into())
    }

    pub fn annotation(msg: impl Into<String>) -> Self {
        PrepError::Annotation(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        PrepError::InvalidArgument(msg.into())
    }

    /// Whether this error must stop a run rather than be handled per row.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PrepError::ScoreUnavailable(_) | PrepError::Annotation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_level_errors_are_not_fatal() {
        assert!(!PrepError::score_unavailable("empty text").is_fatal());
        assert!(!PrepError::annotation("bad topic").is_fatal());
        assert!(PrepError::configuration("missing column").is_fatal());
        assert!(PrepError::format("unknown extension").is_fatal());
    }

    #[test]
    fn test_display_names_the_failed_check() {
        let err = PrepError::configuration("text column 'body' not found");
        assert_eq!(
            err.to_string(),
            "configuration error: text column 'body' not found"
        );
    }
}
