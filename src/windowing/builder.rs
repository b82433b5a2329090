//! Window configuration and the framing loop.

use crate::dataset::Dataset;
use crate::error::{FramerError, Result};
use crate::table::Table;
use tracing::debug;

/// Position of the close price within an open/high/low/close/volume record.
pub const DEFAULT_CLOSE_FIELD: usize = 3;

/// Parameters of the sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Number of preceding rows flattened into each feature vector
    pub hist_length: usize,

    /// Number of rows ahead used to compute the label
    pub pred_lag: usize,

    /// Index of the close price within a record
    pub close_field: usize,
}

impl WindowConfig {
    /// Create a window configuration using the default close field.
    pub fn new(hist_length: usize, pred_lag: usize) -> Self {
        Self {
            hist_length,
            pred_lag,
            close_field: DEFAULT_CLOSE_FIELD,
        }
    }

    /// Set the index of the close price within a record.
    pub fn with_close_field(mut self, close_field: usize) -> Self {
        self.close_field = close_field;
        self
    }

    /// Width of a feature vector built from records of `field_count` fields.
    #[inline]
    pub fn feature_width(&self, field_count: usize) -> usize {
        self.hist_length * field_count
    }

    /// Number of samples a table of `table_len` rows produces.
    #[inline]
    pub fn sample_count(&self, table_len: usize) -> usize {
        table_len.saturating_sub(self.hist_length + self.pred_lag)
    }

    /// Validate configuration.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.hist_length == 0 {
            return Err("hist_length must be > 0".to_string());
        }

        if self.pred_lag == 0 {
            return Err("pred_lag must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(1, 5)
    }
}

/// Frame `table` with the given history length and prediction lag.
///
/// Shorthand for [`frame`] with the close price at [`DEFAULT_CLOSE_FIELD`].
pub fn build(table: &Table, hist_length: usize, pred_lag: usize) -> Result<Dataset> {
    frame(table, &WindowConfig::new(hist_length, pred_lag))
}

/// Turn a price table into aligned feature windows and close-change labels.
///
/// # Errors
///
/// [`FramerError::InvalidConfig`] if `hist_length` or `pred_lag` is zero, or if
/// the close field lies outside the table's records. A table that is too short
/// for any window is not an error and yields an empty dataset.
pub fn frame(table: &Table, config: &WindowConfig) -> Result<Dataset> {
    config.validate().map_err(FramerError::InvalidConfig)?;

    let field_count = table.field_count();
    if !table.is_empty() && config.close_field >= field_count {
        return Err(FramerError::InvalidConfig(format!(
            "close_field ({}) must be < field_count ({})",
            config.close_field, field_count
        )));
    }

    let width = config.feature_width(field_count);
    let n_samples = config.sample_count(table.len());

    debug!(
        rows = table.len(),
        hist_length = config.hist_length,
        pred_lag = config.pred_lag,
        close_field = config.close_field,
        n_samples,
        "framing table"
    );

    if n_samples == 0 {
        return Ok(Dataset::empty(width));
    }

    let records = table.records();
    let close = config.close_field;
    let mut features = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);

    for center in config.hist_length..records.len() - config.pred_lag {
        let mut window = Vec::with_capacity(width);
        for record in &records[center - config.hist_length..center] {
            window.extend_from_slice(record.fields());
        }
        features.push(window);

        let current = records[center].fields()[close];
        let future = records[center + config.pred_lag].fields()[close];
        labels.push(future - current);
    }

    Dataset::new(features, labels, width)
}
