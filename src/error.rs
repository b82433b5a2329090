//! Error type shared by every stage of the framing pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FramerError>;

/// Errors raised while reading a price table, framing it, or persisting the dataset.
#[derive(Debug, Error)]
pub enum FramerError {
    /// The input table could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row does not reach the last configured field.
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        /// 1-based line number in the input file
        line: u64,
        /// Minimum number of fields required by the schema
        expected: usize,
        /// Number of fields actually present
        found: usize,
    },

    /// A selected field is not a decimal number.
    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    NonNumeric {
        /// 1-based line number in the input file
        line: u64,
        /// 0-based column index in the raw row
        column: usize,
        /// Offending raw text
        value: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("failed to write npz archive: {0}")]
    NpzWrite(#[from] ndarray_npy::WriteNpzError),

    #[error("failed to read npz archive: {0}")]
    NpzRead(#[from] ndarray_npy::ReadNpzError),

    /// A persisted dataset is missing one of its arrays.
    #[error("archive has no array named {0:?}")]
    MissingArray(String),

    /// A persisted dataset has a different number of feature rows and labels.
    #[error("dataset is misaligned: {features} feature rows vs {labels} labels")]
    Misaligned {
        /// Number of feature rows
        features: usize,
        /// Number of labels
        labels: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML parse error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl FramerError {
    /// True for errors caused by the content of a single input row.
    ///
    /// These are the errors [`crate::table::RowPolicy::SkipAndWarn`] is allowed to skip.
    pub fn is_row_error(&self) -> bool {
        matches!(self, Self::ShortRow { .. } | Self::NonNumeric { .. })
    }
}
