//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```ignore
//! use price_framer::prelude::*;
//!
//! let config = FramerConfig::default();
//! let output = Pipeline::from_config(&config)?.run()?;
//! ```
//!
//! # What's Included
//!
//! ## Core Pipeline
//! - [`Pipeline`] - Source → frame → sink
//! - [`FramerConfig`] - Run configuration
//! - [`PipelineOutput`] - Run result
//!
//! ## Framing
//! - [`WindowConfig`], [`frame`], [`build`]
//!
//! ## Data
//! - [`Table`], [`Record`], [`Dataset`], [`LabelStats`]
//!
//! ## I/O
//! - [`TableReader`] - CSV ingestion
//! - [`NpzExporter`], [`load_dataset`] - Persistence

// ============================================================================
// Core Pipeline
// ============================================================================

pub use crate::config::{FramerConfig, SplitConfig};
pub use crate::pipeline::{CsvTableSource, DatasetSink, Pipeline, PipelineOutput, TableSource};

// ============================================================================
// Framing
// ============================================================================

pub use crate::windowing::{build, frame, WindowConfig};

// ============================================================================
// Data
// ============================================================================

pub use crate::dataset::{Dataset, DatasetSplit, LabelStats};
pub use crate::table::{Record, RowPolicy, Table, TableSchema};

// ============================================================================
// I/O
// ============================================================================

pub use crate::export::{load_dataset, NpzExporter};
pub use crate::table::TableReader;

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{FramerError, Result};
