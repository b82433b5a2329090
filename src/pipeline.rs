//! End-to-end framing pipeline.
//!
//! The pipeline wires three stages together:
//!
//! ```text
//! TableSource ──► frame() ──► DatasetSink
//!  (CSV read)     (pure)       (npz write)
//! ```
//!
//! Source and sink are traits so tests (and other front-ends) can swap the
//! file-backed implementations for in-memory ones. The framing step in the
//! middle never touches the filesystem.

use crate::config::FramerConfig;
use crate::dataset::{Dataset, LabelStats};
use crate::error::Result;
use crate::export::NpzExporter;
use crate::table::{RowPolicy, Table, TableReader, TableSchema};
use crate::windowing::{frame, WindowConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Something that can produce a price table.
pub trait TableSource {
    fn load_table(&self) -> Result<Table>;
}

/// Something that can persist a framed dataset.
pub trait DatasetSink {
    fn persist(&self, dataset: &Dataset) -> Result<()>;
}

/// [`TableSource`] backed by a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    path: PathBuf,
    reader: TableReader,
}

impl CsvTableSource {
    pub fn new<P: AsRef<Path>>(path: P, schema: TableSchema, policy: RowPolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reader: TableReader::new(schema).with_policy(policy),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvTableSource {
    fn load_table(&self) -> Result<Table> {
        self.reader.read_path(&self.path)
    }
}

/// In-memory tables are their own source.
impl TableSource for Table {
    fn load_table(&self) -> Result<Table> {
        Ok(self.clone())
    }
}

impl DatasetSink for NpzExporter {
    fn persist(&self, dataset: &Dataset) -> Result<()> {
        self.export(dataset)
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The framed dataset, as persisted
    pub dataset: Dataset,

    /// Rows kept by ingestion
    pub rows_read: usize,

    /// Rows dropped by ingestion
    pub rows_skipped: usize,

    /// Label summary (None when the dataset is empty)
    pub label_stats: Option<LabelStats>,
}

/// Load → frame → persist.
pub struct Pipeline<S, K> {
    source: S,
    sink: K,
    window: WindowConfig,
}

impl<S: TableSource, K: DatasetSink> Pipeline<S, K> {
    pub fn new(source: S, sink: K, window: WindowConfig) -> Self {
        Self {
            source,
            sink,
            window,
        }
    }

    pub fn window(&self) -> &WindowConfig {
        &self.window
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Run every stage once.
    ///
    /// Nothing is persisted if loading or framing fails.
    pub fn run(&self) -> Result<PipelineOutput> {
        let table = self.source.load_table()?;
        info!(
            rows = table.len(),
            skipped = table.skipped_rows(),
            field_count = table.field_count(),
            "table loaded"
        );

        let dataset = frame(&table, &self.window)?;
        let label_stats = dataset.label_stats();
        info!(
            samples = dataset.len(),
            feature_width = dataset.feature_width(),
            label_std = label_stats.map(|s| s.std),
            "dataset framed"
        );

        self.sink.persist(&dataset)?;
        info!("dataset persisted");

        Ok(PipelineOutput {
            dataset,
            rows_read: table.len(),
            rows_skipped: table.skipped_rows(),
            label_stats,
        })
    }
}

impl Pipeline<CsvTableSource, NpzExporter> {
    /// Build the file-backed pipeline described by `config`.
    pub fn from_config(config: &FramerConfig) -> Result<Self> {
        config.check()?;

        let source = CsvTableSource::new(&config.input, config.table.clone(), config.row_policy);
        let mut sink = NpzExporter::new(&config.output);
        if config.write_metadata {
            sink = sink.with_metadata(config.window);
        }

        Ok(Self::new(source, sink, config.window))
    }
}
