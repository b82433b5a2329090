//! Sliding-window feature and label construction.
//!
//! For every center row `i` in `[hist_length, len - pred_lag)` the builder emits
//!
//! ```text
//! features = fields(i - hist_length) ++ ... ++ fields(i - 1)     // oldest first
//! label    = close(i + pred_lag) - close(i)
//! ```
//!
//! so a table of `n` rows yields `max(0, n - hist_length - pred_lag)` samples,
//! each `hist_length * field_count` values wide. Tables too short for a single
//! window produce an empty dataset rather than an error.
//!
//! # Example
//!
//! ```
//! use price_framer::table::Table;
//! use price_framer::windowing::{frame, WindowConfig};
//!
//! let table = Table::from_rows((0..8).map(|i| vec![i as f64; 5])).unwrap();
//! let dataset = frame(&table, &WindowConfig::new(2, 3)).unwrap();
//!
//! assert_eq!(dataset.len(), 3);
//! assert_eq!(dataset.feature_width(), 10);
//! assert_eq!(dataset.labels(), &[3.0, 3.0, 3.0]);
//! ```

mod builder;

pub use builder::{build, frame, WindowConfig, DEFAULT_CLOSE_FIELD};
