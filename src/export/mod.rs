//! Dataset Export Module
//!
//! Persist framed datasets for ML training and load them back.
//!
//! # Format
//!
//! A single NumPy `.npz` archive with two arrays:
//!
//! - `features`: \[N_samples, feature_width\] `float64`
//! - `labels`: \[N_samples\] `float64`
//!
//! The archive opens directly with `numpy.load(path)` regardless of the file
//! extension. Values are stored bit-exact, so loading returns the same floats
//! that were written.
//!
//! Optionally a JSON sidecar (`<stem>.meta.json` next to the archive) records how the
//! dataset was framed.
//!
//! # Example
//!
//! ```ignore
//! use price_framer::export::{load_dataset, NpzExporter};
//!
//! let exporter = NpzExporter::new("stockTT.bin").with_metadata(window_config);
//! exporter.export(&dataset)?;
//!
//! let restored = load_dataset("stockTT.bin")?;
//! assert_eq!(restored, dataset);
//! ```

use crate::dataset::{Dataset, DatasetSplit};
use crate::error::{FramerError, Result};
use crate::windowing::WindowConfig;
use ndarray::{Array1, Array2};
use ndarray_npy::{NpzReader, NpzWriter};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Archive entry holding the feature matrix.
pub const FEATURES_ARRAY: &str = "features";

/// Archive entry holding the label vector.
pub const LABELS_ARRAY: &str = "labels";

/// Metadata about an exported dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Number of samples (feature rows)
    pub n_samples: usize,

    /// Values per feature vector
    pub feature_width: usize,

    /// Number of labels (always equals n_samples)
    pub n_labels: usize,

    /// Preceding rows per window
    pub hist_length: usize,

    /// Rows ahead used for the label
    pub pred_lag: usize,

    /// Close price index within a record
    pub close_field: usize,

    /// Label mean (absent for empty datasets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_mean: Option<f64>,

    /// Label population standard deviation (absent for empty datasets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_std: Option<f64>,

    /// Export timestamp
    pub export_timestamp: String,
}

impl ExportMetadata {
    pub fn describe(dataset: &Dataset, window: &WindowConfig) -> Self {
        let stats = dataset.label_stats();
        Self {
            n_samples: dataset.len(),
            feature_width: dataset.feature_width(),
            n_labels: dataset.labels().len(),
            hist_length: window.hist_length,
            pred_lag: window.pred_lag,
            close_field: window.close_field,
            label_mean: stats.map(|s| s.mean),
            label_std: stats.map(|s| s.std),
            export_timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Writes a [`Dataset`] to a single `.npz` archive.
#[derive(Debug, Clone)]
pub struct NpzExporter {
    output_path: PathBuf,
    window: Option<WindowConfig>,
}

impl NpzExporter {
    /// Create an exporter writing to `output_path`.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
            window: None,
        }
    }

    /// Also write a JSON metadata sidecar describing the window parameters.
    pub fn with_metadata(mut self, window: WindowConfig) -> Self {
        self.window = Some(window);
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Path of the metadata sidecar.
    ///
    /// `stockTT.bin` becomes `stockTT.meta.json`. The result always differs
    /// from the output path, even for outputs that already end in `.json`.
    pub fn metadata_path(&self) -> PathBuf {
        self.output_path.with_extension("meta.json")
    }

    /// Export the dataset (and metadata, if enabled).
    pub fn export(&self, dataset: &Dataset) -> Result<()> {
        write_npz(&self.output_path, dataset)?;

        if let Some(window) = &self.window {
            let metadata = ExportMetadata::describe(dataset, window);
            let path = self.metadata_path();
            let file = File::create(&path)?;
            serde_json::to_writer_pretty(file, &metadata)?;
            info!(path = %path.display(), "exported metadata");
        }

        Ok(())
    }

    /// Export the train and test halves next to the main output.
    ///
    /// `stockTT.bin` becomes `stockTT_train.bin` and `stockTT_test.bin`.
    /// Returns the two paths written, train first.
    pub fn export_split(&self, split: &DatasetSplit) -> Result<(PathBuf, PathBuf)> {
        let train_path = self.sibling_path("train");
        let test_path = self.sibling_path("test");

        write_npz(&train_path, &split.train)?;
        write_npz(&test_path, &split.test)?;

        Ok((train_path, test_path))
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());

        let name = match self.output_path.extension() {
            Some(ext) => format!("{stem}_{suffix}.{}", ext.to_string_lossy()),
            None => format!("{stem}_{suffix}"),
        };

        self.output_path.with_file_name(name)
    }
}

/// Convenience function for direct export
pub fn export_dataset<P: AsRef<Path>>(dataset: &Dataset, output_path: P) -> Result<()> {
    NpzExporter::new(output_path).export(dataset)
}

/// Load a dataset previously written by [`NpzExporter`].
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FramerError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut npz = NpzReader::new(file)?;
    let features_entry = find_entry(&mut npz, FEATURES_ARRAY)?;
    let labels_entry = find_entry(&mut npz, LABELS_ARRAY)?;

    let features: Array2<f64> = npz.by_name(&features_entry)?;
    let labels: Array1<f64> = npz.by_name(&labels_entry)?;

    let dataset = Dataset::from_arrays(features, labels)?;
    info!(
        path = %path.display(),
        samples = dataset.len(),
        feature_width = dataset.feature_width(),
        "loaded dataset"
    );
    Ok(dataset)
}

fn write_npz(path: &Path, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let (features, labels) = dataset.to_arrays()?;

    let file = File::create(path)?;
    let mut npz = NpzWriter::new(file);
    npz.add_array(FEATURES_ARRAY, &features)?;
    npz.add_array(LABELS_ARRAY, &labels)?;
    npz.finish()?;

    info!(
        path = %path.display(),
        samples = dataset.len(),
        feature_width = dataset.feature_width(),
        "exported dataset"
    );

    Ok(())
}

/// Archive entries carry a `.npy` suffix; match with or without it.
fn find_entry<R: std::io::Read + std::io::Seek>(
    npz: &mut NpzReader<R>,
    name: &str,
) -> Result<String> {
    npz.names()?
        .into_iter()
        .find(|entry| entry.strip_suffix(".npy").unwrap_or(entry.as_str()) == name)
        .ok_or_else(|| FramerError::MissingArray(name.to_string()))
}
