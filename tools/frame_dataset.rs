//! Price Table Framing Tool
//!
//! Reads a time-ordered price CSV, builds sliding-window features with
//! close-change labels, and writes them to a NumPy `.npz` archive.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: table_a.csv -> stockTT.bin, hist_length=1, pred_lag=5
//! cargo run --release --bin frame_dataset
//!
//! # Custom window and a chronological 80/20 split
//! cargo run --release --bin frame_dataset -- --hist-length 10 --pred-lag 5 --split
//!
//! # From TOML config (command-line flags still override it)
//! cargo run --release --bin frame_dataset -- --config framing.toml
//!
//! # Generate sample config
//! cargo run --release --bin frame_dataset -- --generate-config framing.toml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use price_framer::config::DEFAULT_TRAIN_FRAC;
use price_framer::{FramerConfig, Pipeline, PipelineOutput, RowPolicy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "frame_dataset")]
#[command(about = "Build a windowed feature/label dataset from a price CSV", long_about = None)]
struct Cli {
    /// Load settings from a TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a sample config file and exit
    #[arg(long, value_name = "PATH")]
    generate_config: Option<PathBuf>,

    /// Input CSV file [default: table_a.csv]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output dataset file [default: stockTT.bin]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Preceding rows flattened into each feature vector [default: 1]
    #[arg(long)]
    hist_length: Option<usize>,

    /// Rows ahead used for the label [default: 5]
    #[arg(long)]
    pred_lag: Option<usize>,

    /// Close price index within a record [default: 3]
    #[arg(long)]
    close_field: Option<usize>,

    /// First raw column parsed into a record [default: 2]
    #[arg(long)]
    first_field: Option<usize>,

    /// Number of raw columns parsed into a record [default: 5]
    #[arg(long)]
    field_count: Option<usize>,

    /// Skip malformed rows with a warning instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Also write chronological train/test files
    #[arg(long)]
    split: bool,

    /// Training fraction for --split [default: 0.8]
    #[arg(long, requires = "split")]
    train_frac: Option<f64>,

    /// Write a JSON metadata sidecar next to the output
    #[arg(long)]
    metadata: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Some(path) = &cli.generate_config {
        FramerConfig::default()
            .with_split(DEFAULT_TRAIN_FRAC)
            .save_toml(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✅ Generated sample config: {}", path.display());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    print_config_summary(&config);

    let pipeline = Pipeline::from_config(&config).context("invalid configuration")?;
    let output = pipeline
        .run()
        .with_context(|| format!("failed to frame {}", config.input.display()))?;

    println!("✅ Exported dataset: {}", config.output.display());
    if config.write_metadata {
        println!("✅ Exported metadata: {}", pipeline.sink().metadata_path().display());
    }

    if let Some(split) = config.split {
        let halves = output
            .dataset
            .split(split.train_frac)
            .context("failed to split dataset")?;
        let (train_path, test_path) = pipeline
            .sink()
            .export_split(&halves)
            .context("failed to write split files")?;
        println!(
            "✅ Train: {} [{} samples]",
            train_path.display(),
            halves.train.len()
        );
        println!(
            "✅ Test:  {} [{} samples]",
            test_path.display(),
            halves.test.len()
        );
    }

    print_diagnostics(&output);
    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<FramerConfig> {
    let mut config = match &cli.config {
        Some(path) => FramerConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FramerConfig::default(),
    };

    if let Some(input) = &cli.input {
        config.input = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(hist_length) = cli.hist_length {
        config.window.hist_length = hist_length;
    }
    if let Some(pred_lag) = cli.pred_lag {
        config.window.pred_lag = pred_lag;
    }
    if let Some(close_field) = cli.close_field {
        config.window.close_field = close_field;
    }
    if let Some(first_field) = cli.first_field {
        config.table.first_field = first_field;
    }
    if let Some(field_count) = cli.field_count {
        config.table.field_count = field_count;
    }
    if cli.skip_malformed {
        config.row_policy = RowPolicy::SkipAndWarn;
    }
    if cli.split {
        let train_frac = cli
            .train_frac
            .or(config.split.map(|s| s.train_frac))
            .unwrap_or(DEFAULT_TRAIN_FRAC);
        config = config.with_split(train_frac);
    }
    if cli.metadata {
        config.write_metadata = true;
    }

    Ok(config)
}

fn print_config_summary(config: &FramerConfig) {
    println!("┌─ Configuration Summary ───────────────────────────────────────┐");
    println!("│ Input:       {}", config.input.display());
    println!("│ Output:      {}", config.output.display());
    println!(
        "│ Columns:     {}..{} (close at +{})",
        config.table.first_field,
        config.table.first_field + config.table.field_count,
        config.window.close_field
    );
    println!("│ hist_length: {}", config.window.hist_length);
    println!("│ pred_lag:    {}", config.window.pred_lag);
    println!("│ Row policy:  {:?}", config.row_policy);
    if let Some(split) = &config.split {
        println!("│ Split:       {:.2} train", split.train_frac);
    }
    println!("└────────────────────────────────────────────────────────────────┘");
    println!();
}

fn print_diagnostics(output: &PipelineOutput) {
    let dataset = &output.dataset;
    let label_std = output
        .label_stats
        .map(|s| format!("{:.6}", s.std))
        .unwrap_or_else(|| "n/a".to_string());

    println!();
    println!("Rows read:      {}", output.rows_read);
    if output.rows_skipped > 0 {
        println!("Rows skipped:   {}", output.rows_skipped);
    }
    println!("Features:       {}", dataset.len());
    println!("Feature width:  {}", dataset.feature_width());
    println!("Labels:         {}", dataset.labels().len());
    println!("Label std:      {}", label_std);
}
