//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use console::style;
use polars::prelude::*;
use std::path::Path;
use tracing::info;

use crate::utils::create_spinner;

/// Supported input formats, determined by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "parquet" => Ok(FileFormat::Parquet),
            _ => anyhow::bail!(
                "Unsupported file format: '{}'. Supported formats: csv, parquet",
                extension
            ),
        }
    }
}

/// Open a dataset lazily.
///
/// `infer_schema_length` only applies to CSV; 0 means a full table scan.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let lf = match FileFormat::from_path(path)? {
        FileFormat::Csv => {
            let schema_length = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        FileFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
    };

    Ok(lf)
}

/// Load a dataset into memory behind a spinner.
///
/// Returns the frame with its row count, column count and estimated size in MB.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));

    let df = load_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);

    spinner.finish_with_message(format!(
        "{} Loaded {} rows x {} columns",
        style("✓").green(),
        rows,
        cols
    ));
    info!(path = %path.display(), rows, cols, memory_mb, "dataset loaded");

    Ok((df, rows, cols, memory_mb))
}

/// Column names from the file schema, without reading the data.
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let schema = load_dataset(path, 100)?
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;

    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}
