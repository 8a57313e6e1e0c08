//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Rows in [`create_scoring_dataframe`]
pub const SCORING_ROWS: usize = 200;

/// Create a scoring DataFrame with known characteristics for testing
///
/// This DataFrame includes:
/// - `y`: Continuous target 0..200 (median split puts rows 100.. in the good class)
/// - `signal`: Increases with `y` apart from small periodic wiggles
/// - `noise`: Pseudo-random permutation-like values, unrelated to `y`
/// - `flag`: Only two distinct values
/// - `sparse`: Present in the first 8 rows only
/// - `empty`: Entirely missing
/// - `segment`: String column (never analyzed)
pub fn create_scoring_dataframe() -> DataFrame {
    let n = SCORING_ROWS;
    df! {
        "y" => (0..n).map(|i| i as f64).collect::<Vec<_>>(),
        "signal" => (0..n).map(|i| i as f64 * 0.5 + (i % 7) as f64).collect::<Vec<_>>(),
        "noise" => (0..n).map(|i| ((i * 37) % 101) as f64).collect::<Vec<_>>(),
        "flag" => (0..n).map(|i| (i % 2) as f64).collect::<Vec<_>>(),
        "sparse" => (0..n).map(|i| if i < 8 { Some(i as f64) } else { None }).collect::<Vec<_>>(),
        "empty" => vec![None::<f64>; n],
        "segment" => (0..n).map(|i| if i % 3 == 0 { "a" } else { "b" }).collect::<Vec<_>>(),
    }
    .unwrap()
}

/// Create a random DataFrame with a continuous target `y` and `cols` features
///
/// Roughly 5% of feature values are missing. The same seed always yields the
/// same frame.
pub fn create_random_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);

    let target: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..100.0)).collect();
    columns.push(Column::new("y".into(), target));

    for i in 0..cols {
        let values: Vec<Option<f64>> = (0..rows)
            .map(|_| {
                if rng.gen_bool(0.05) {
                    None
                } else {
                    Some(rng.gen_range(0..50) as f64)
                }
            })
            .collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Create a DataFrame with known correlation patterns against `target`
pub fn create_correlation_test_dataframe() -> DataFrame {
    df! {
        "target" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "doubled" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0], // 2 * target
        "negated" => [-1.0f64, -2.0, -3.0, -4.0, -5.0, -6.0, -7.0, -8.0, -9.0, -10.0], // -target
        "shuffled" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0],
        "constant" => [3.0f64; 10],
        "gappy" => [
            Some(1.0f64), None, Some(3.0), None, Some(5.0), None, Some(7.0), None, Some(9.0), None,
        ],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(
        cols, expected_cols,
        "Column count mismatch: expected {}, got {}",
        expected_cols, cols
    );
}

/// Assert two floats agree to within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} to be within {} of {}",
        actual,
        tol,
        expected
    );
}
