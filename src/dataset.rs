//! Supervised-learning dataset: feature windows with their aligned labels.

use crate::error::{FramerError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Index-aligned feature vectors and labels.
///
/// `features[k]` is the flattened history window for the k-th center row and
/// `labels[k]` is the close-price change observed `pred_lag` rows after it.
/// Every feature vector has exactly `feature_width` values, which is also kept
/// for empty datasets so they can be persisted with a meaningful shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<f64>,
    feature_width: usize,
}

impl Dataset {
    /// Build a dataset, checking alignment and row widths.
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<f64>, feature_width: usize) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(FramerError::Misaligned {
                features: features.len(),
                labels: labels.len(),
            });
        }

        if let Some(row) = features.iter().find(|row| row.len() != feature_width) {
            return Err(FramerError::InvalidConfig(format!(
                "feature vector has {} values, expected {}",
                row.len(),
                feature_width
            )));
        }

        Ok(Self {
            features,
            labels,
            feature_width,
        })
    }

    /// An empty dataset whose (absent) feature vectors are `feature_width` wide.
    pub fn empty(feature_width: usize) -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
            feature_width,
        }
    }

    /// Rebuild a dataset from the two persisted arrays.
    pub fn from_arrays(features: Array2<f64>, labels: Array1<f64>) -> Result<Self> {
        let (rows, width) = features.dim();
        if rows != labels.len() {
            return Err(FramerError::Misaligned {
                features: rows,
                labels: labels.len(),
            });
        }

        Ok(Self {
            features: features.outer_iter().map(|row| row.to_vec()).collect(),
            labels: labels.to_vec(),
            feature_width: width,
        })
    }

    /// Convert to `[n_samples, feature_width]` features and `[n_samples]` labels.
    pub fn to_arrays(&self) -> Result<(Array2<f64>, Array1<f64>)> {
        let flat: Vec<f64> = self
            .features
            .iter()
            .flat_map(|row| row.iter().copied())
            .collect();
        let features = Array2::from_shape_vec((self.len(), self.feature_width), flat)?;
        let labels = Array1::from_vec(self.labels.clone());
        Ok((features, labels))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn feature_width(&self) -> usize {
        self.feature_width
    }

    #[inline]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    #[inline]
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Consume the dataset and return `(features, labels)`.
    pub fn into_parts(self) -> (Vec<Vec<f64>>, Vec<f64>) {
        (self.features, self.labels)
    }

    /// Summary statistics of the labels, `None` when there are no labels.
    pub fn label_stats(&self) -> Option<LabelStats> {
        LabelStats::from_values(&self.labels)
    }

    /// Split chronologically into a training prefix and a test suffix.
    ///
    /// The first `floor(train_frac * len)` samples go to `train`, the rest to `test`.
    /// No shuffling is done, so the test set always lies after the training set in time.
    pub fn split(&self, train_frac: f64) -> Result<DatasetSplit> {
        if !(0.0..=1.0).contains(&train_frac) {
            return Err(FramerError::InvalidConfig(format!(
                "train_frac must be within [0, 1], got {train_frac}"
            )));
        }

        let train_end = ((train_frac * self.len() as f64).floor() as usize).min(self.len());

        Ok(DatasetSplit {
            train: self.slice(0, train_end),
            test: self.slice(train_end, self.len()),
            train_frac,
        })
    }

    fn slice(&self, start: usize, end: usize) -> Dataset {
        Dataset {
            features: self.features[start..end].to_vec(),
            labels: self.labels[start..end].to_vec(),
            feature_width: self.feature_width,
        }
    }
}

/// Chronological train/test partition of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub train: Dataset,
    pub test: Dataset,
    pub train_frac: f64,
}

/// Label distribution summary.
///
/// `std` is the population standard deviation (divisor `n`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl LabelStats {
    /// Compute statistics over `values`; `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: values.len(),
            mean,
            std: variance.sqrt(),
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> Dataset {
        let features = (0..n).map(|i| vec![i as f64, i as f64 * 10.0]).collect();
        let labels = (0..n).map(|i| i as f64 - 1.0).collect();
        Dataset::new(features, labels, 2).unwrap()
    }

    #[test]
    fn test_new_rejects_misaligned() {
        let result = Dataset::new(vec![vec![1.0]], vec![], 1);
        assert!(matches!(
            result,
            Err(FramerError::Misaligned {
                features: 1,
                labels: 0
            })
        ));
    }

    #[test]
    fn test_new_rejects_wrong_width() {
        let result = Dataset::new(vec![vec![1.0, 2.0]], vec![0.5], 3);
        assert!(result.is_err());
    }

    #[test]
    fn test_label_stats_population_std() {
        // mean 5, squared deviations sum to 32 over 8 values -> std 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = LabelStats::from_values(&values).unwrap();
        assert_eq!(stats.count, 8);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std - 2.0).abs() < 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_label_stats_empty() {
        assert!(Dataset::empty(5).label_stats().is_none());
    }

    #[test]
    fn test_split_floors_train_size() {
        let split = sample(10).split(0.8).unwrap();
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.test.features()[0], vec![8.0, 80.0]);

        let split = sample(7).split(0.5).unwrap();
        assert_eq!(split.train.len(), 3);
        assert_eq!(split.test.len(), 4);
    }

    #[test]
    fn test_split_extremes() {
        let data = sample(4);
        let all_test = data.split(0.0).unwrap();
        assert!(all_test.train.is_empty());
        assert_eq!(all_test.test, data);

        let all_train = data.split(1.0).unwrap();
        assert_eq!(all_train.train, data);
        assert!(all_train.test.is_empty());
        assert_eq!(all_train.test.feature_width(), 2);
    }

    #[test]
    fn test_split_rejects_out_of_range() {
        assert!(sample(3).split(1.5).is_err());
        assert!(sample(3).split(-0.1).is_err());
        assert!(sample(3).split(f64::NAN).is_err());
    }

    #[test]
    fn test_array_conversion_keeps_shape() {
        let data = sample(3);
        let (features, labels) = data.to_arrays().unwrap();
        assert_eq!(features.shape(), &[3, 2]);
        assert_eq!(labels.len(), 3);

        let back = Dataset::from_arrays(features, labels).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_empty_array_conversion_keeps_width() {
        let (features, labels) = Dataset::empty(10).to_arrays().unwrap();
        assert_eq!(features.shape(), &[0, 10]);
        let back = Dataset::from_arrays(features, labels).unwrap();
        assert!(back.is_empty());
        assert_eq!(back.feature_width(), 10);
    }
}
