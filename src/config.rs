//! Framing configuration management.
//!
//! One serializable struct covers every stage of a run: where the table comes
//! from and how its columns are laid out, the window parameters, the
//! malformed-row policy, and where the dataset goes.
//!
//! # Features
//!
//! - **Defaults**: `FramerConfig::default()` reads `table_a.csv`, frames with
//!   `hist_length = 1`, `pred_lag = 5`, and writes `stockTT.bin`
//! - **Serialization**: Save/load configurations to TOML or JSON
//! - **Validation**: Ensure configurations are valid before use
//!
//! # Example
//!
//! ```ignore
//! use price_framer::config::FramerConfig;
//!
//! let config = FramerConfig::default();
//! config.save_toml("framing.toml")?;
//!
//! let loaded = FramerConfig::load_toml("framing.toml")?;
//! let output = Pipeline::from_config(&loaded)?.run()?;
//! ```

use crate::error::{FramerError, Result};
use crate::table::{RowPolicy, TableSchema};
use crate::windowing::WindowConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Default input table name.
pub const DEFAULT_INPUT: &str = "table_a.csv";

/// Default dataset output name.
pub const DEFAULT_OUTPUT: &str = "stockTT.bin";

/// Default training fraction for the optional chronological split.
pub const DEFAULT_TRAIN_FRAC: f64 = 0.80;

/// Complete configuration for one framing run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    /// Input CSV path
    pub input: PathBuf,

    /// Output dataset path
    pub output: PathBuf,

    /// Malformed row handling
    pub row_policy: RowPolicy,

    /// Write a JSON metadata sidecar next to the output
    pub write_metadata: bool,

    /// Column layout of the input file
    pub table: TableSchema,

    /// Window parameters
    pub window: WindowConfig,

    /// Chronological train/test split (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitConfig>,
}

/// Chronological train/test split settings.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SplitConfig {
    /// Fraction of samples (from the start) that go to the training set
    pub train_frac: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_frac: DEFAULT_TRAIN_FRAC,
        }
    }
}

impl SplitConfig {
    /// Validate configuration.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0..=1.0).contains(&self.train_frac) {
            return Err(format!(
                "train_frac must be within [0, 1], got {}",
                self.train_frac
            ));
        }
        Ok(())
    }
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            row_policy: RowPolicy::default(),
            write_metadata: false,
            table: TableSchema::default(),
            window: WindowConfig::default(),
            split: None,
        }
    }
}

impl FramerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }

    pub fn with_output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }

    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.table = table;
        self
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_row_policy(mut self, policy: RowPolicy) -> Self {
        self.row_policy = policy;
        self
    }

    /// Enable the chronological split with the given training fraction.
    pub fn with_split(mut self, train_frac: f64) -> Self {
        self.split = Some(SplitConfig { train_frac });
        self
    }

    pub fn with_metadata(mut self, enabled: bool) -> Self {
        self.write_metadata = enabled;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.table.validate()?;
        self.window.validate()?;

        if self.window.close_field >= self.table.field_count {
            return Err(format!(
                "close_field ({}) must be < table.field_count ({})",
                self.window.close_field, self.table.field_count
            ));
        }

        if let Some(split) = &self.split {
            split.validate()?;
        }

        if self.input.as_os_str().is_empty() {
            return Err("input path must not be empty".to_string());
        }

        if self.output.as_os_str().is_empty() {
            return Err("output path must not be empty".to_string());
        }

        Ok(())
    }

    /// Validate and lift the message into a [`FramerError`].
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(FramerError::InvalidConfig)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| FramerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let config: FramerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| FramerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let config: FramerConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = FramerConfig::default();
        assert_eq!(config.input, PathBuf::from("table_a.csv"));
        assert_eq!(config.output, PathBuf::from("stockTT.bin"));
        assert_eq!(config.window.hist_length, 1);
        assert_eq!(config.window.pred_lag, 5);
        assert_eq!(config.row_policy, RowPolicy::Strict);
        assert!(config.split.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("framing.toml");

        let config = FramerConfig::default()
            .with_window(WindowConfig::new(4, 2))
            .with_row_policy(RowPolicy::SkipAndWarn)
            .with_split(0.75)
            .with_metadata(true);
        config.save_toml(&path).unwrap();

        let loaded = FramerConfig::load_toml(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("framing.json");

        let config = FramerConfig::default().with_input("prices.csv");
        config.save_json(&path).unwrap();

        let loaded = FramerConfig::load_json(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            input = "prices.csv"

            [window]
            hist_length = 3
        "#;
        let config: FramerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.input, PathBuf::from("prices.csv"));
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.window.hist_length, 3);
        assert_eq!(config.window.pred_lag, 5);
        assert_eq!(config.table.first_field, 2);
    }

    #[test]
    fn test_validation_failures() {
        let bad_close = FramerConfig::default().with_window(WindowConfig::new(1, 5).with_close_field(5));
        assert!(bad_close.validate().is_err());

        let bad_split = FramerConfig::default().with_split(1.2);
        assert!(bad_split.validate().is_err());

        let bad_window = FramerConfig::default().with_window(WindowConfig::new(0, 5));
        assert!(matches!(bad_window.check(), Err(FramerError::InvalidConfig(_))));
    }
}
