//! Price table model and CSV ingestion.
//!
//! A [`Table`] is the in-memory, time-ordered list of [`Record`]s that the
//! windowing stage reads. Every record carries the same number of fields,
//! selected from each raw CSV row by a [`TableSchema`].
//!
//! # Example
//!
//! ```ignore
//! use price_framer::table::{RowPolicy, TableReader, TableSchema};
//!
//! // Columns 2..=6 of every row: open, high, low, close, volume
//! let reader = TableReader::new(TableSchema::default()).with_policy(RowPolicy::Strict);
//! let table = reader.read_path("table_a.csv")?;
//! assert_eq!(table.field_count(), 5);
//! ```

mod reader;

pub use reader::TableReader;

use crate::error::{FramerError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One parsed row of the input table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<f64>,
}

impl Record {
    pub fn new(fields: Vec<f64>) -> Self {
        Self { fields }
    }

    /// All selected fields, in column order.
    #[inline]
    pub fn fields(&self) -> &[f64] {
        &self.fields
    }

    /// Field at `index` relative to the first selected column.
    #[inline]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.fields.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<f64>> for Record {
    fn from(fields: Vec<f64>) -> Self {
        Self::new(fields)
    }
}

/// Time-ordered sequence of records, oldest first.
///
/// Built once by ingestion (or [`Table::from_rows`]) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    records: Vec<Record>,
    field_count: usize,
    skipped_rows: usize,
}

impl Table {
    /// Build a table from already-parsed rows.
    ///
    /// The width is taken from the first row; every other row must match it.
    /// An empty input yields an empty table of width 0.
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        let records: Vec<Record> = rows.into_iter().map(Into::into).collect();
        let field_count = records.first().map_or(0, Record::len);

        if let Some((idx, bad)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != field_count)
        {
            return Err(FramerError::InvalidConfig(format!(
                "row {} has {} fields, expected {}",
                idx,
                bad.len(),
                field_count
            )));
        }

        Ok(Self {
            records,
            field_count,
            skipped_rows: 0,
        })
    }

    pub(crate) fn from_parts(records: Vec<Record>, field_count: usize, skipped_rows: usize) -> Self {
        debug_assert!(records.iter().all(|r| r.len() == field_count));
        Self {
            records,
            field_count,
            skipped_rows,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of fields in every record.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Rows dropped during ingestion under [`RowPolicy::SkipAndWarn`].
    #[inline]
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Column layout of the raw CSV file.
///
/// The defaults select columns 2 through 6 (open, high, low, close, volume)
/// from comma-separated rows without a header line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    /// Index of the first selected column in the raw row
    pub first_field: usize,

    /// Number of consecutive columns selected per row
    pub field_count: usize,

    /// Field delimiter (must be ASCII)
    pub delimiter: char,

    /// Skip the first line of the file
    pub has_headers: bool,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            first_field: 2,
            field_count: 5,
            delimiter: ',',
            has_headers: false,
        }
    }
}

impl TableSchema {
    /// Raw column indices that are parsed into each record.
    pub fn columns(&self) -> Range<usize> {
        self.first_field..self.required_fields()
    }

    /// Minimum number of fields a raw row must have.
    ///
    /// Saturates on overflow; [`TableSchema::validate`] rejects such schemas.
    pub fn required_fields(&self) -> usize {
        self.first_field.saturating_add(self.field_count)
    }

    /// Validate schema.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.field_count == 0 {
            return Err("field_count must be > 0".to_string());
        }

        if self.first_field.checked_add(self.field_count).is_none() {
            return Err(format!(
                "first_field ({}) + field_count ({}) overflows",
                self.first_field, self.field_count
            ));
        }

        if !self.delimiter.is_ascii() {
            return Err(format!(
                "delimiter {:?} must be a single ASCII character",
                self.delimiter
            ));
        }

        Ok(())
    }
}

/// What to do with a row that is too short or holds a non-numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Abort ingestion on the first malformed row
    #[default]
    Strict,

    /// Drop the row, log a warning, and keep going
    SkipAndWarn,
}
