//! Price Framer
//!
//! Turns a time-ordered table of price records into a supervised-learning
//! dataset of sliding-window feature vectors and future close-change labels.
//!
//! # Overview
//!
//! Each input row contributes a [`Record`] (by default the open, high, low,
//! close and volume columns). For every center row `i` the builder flattens the
//! `hist_length` preceding records into a feature vector and labels it with
//! `close(i + pred_lag) - close(i)`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Price Framer                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  table/      - CSV ingestion into an in-memory Table            │
//! │  windowing/  - Feature windows and close-change labels (pure)   │
//! │  dataset     - Aligned features/labels, stats, chrono split     │
//! │  export/     - NumPy .npz persistence and loading               │
//! │  pipeline    - Source → frame → sink wiring                     │
//! │  config      - Serializable run configuration                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use price_framer::{FramerConfig, Pipeline};
//!
//! let config = FramerConfig::default(); // table_a.csv -> stockTT.bin
//! let output = Pipeline::from_config(&config)?.run()?;
//!
//! println!("{} samples × {} features", output.dataset.len(), output.dataset.feature_width());
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod prelude;
pub mod table;
pub mod windowing;

// Re-exports - Errors
pub use error::{FramerError, Result};

// Re-exports - Config
pub use config::{FramerConfig, SplitConfig};

// Re-exports - Table
pub use table::{Record, RowPolicy, Table, TableReader, TableSchema};

// Re-exports - Windowing
pub use windowing::{build, frame, WindowConfig};

// Re-exports - Dataset
pub use dataset::{Dataset, DatasetSplit, LabelStats};

// Re-exports - Export
pub use export::{export_dataset, load_dataset, ExportMetadata, NpzExporter};

// Re-exports - Pipeline
pub use pipeline::{CsvTableSource, DatasetSink, Pipeline, PipelineOutput, TableSource};
