//! Integration tests for dataset loading

use polars::prelude::*;
use simply_eda::pipeline::{
    build_lift, get_column_names, load_dataset, load_dataset_with_progress, AnalysisConfig,
    FileFormat,
};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let (df, rows, cols, mem_mb) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 2, "Should have 2 data rows");
    assert_eq!(cols, 3, "Should have 3 columns");
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
    assert!(mem_mb >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let mut df = common::create_scoring_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let (loaded, rows, cols, _mem) = load_dataset_with_progress(&parquet_path, 100).unwrap();

    common::assert_shape(&loaded, common::SCORING_ROWS, 7);
    assert_eq!(rows, common::SCORING_ROWS);
    assert_eq!(cols, 7);
    assert_eq!(loaded.column("empty").unwrap().null_count(), common::SCORING_ROWS);
}

#[test]
fn test_file_format_detection() {
    assert_eq!(FileFormat::from_path(Path::new("a.csv")).unwrap(), FileFormat::Csv);
    assert_eq!(FileFormat::from_path(Path::new("A.CSV")).unwrap(), FileFormat::Csv);
    assert_eq!(
        FileFormat::from_path(Path::new("dir/b.parquet")).unwrap(),
        FileFormat::Parquet
    );
    assert!(FileFormat::from_path(Path::new("no_extension")).is_err());
}

#[test]
fn test_get_column_names_csv() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "col_a,col_b,col_c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    drop(file);

    let columns = get_column_names(&csv_path).unwrap();

    assert_eq!(columns, vec!["col_a", "col_b", "col_c"]);
}

#[test]
fn test_get_column_names_parquet() {
    let mut df = common::create_correlation_test_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let columns = get_column_names(&parquet_path).unwrap();

    assert_eq!(columns.len(), 6);
    assert_eq!(columns[0], "target");
    assert!(columns.contains(&"gappy".to_string()));
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("test.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let result = load_dataset_with_progress(&bad_path, 100);

    assert!(result.is_err(), "Unsupported format should return error");
    let err_msg = result.unwrap_err().to_string();
    assert!(
        err_msg.contains("Unsupported"),
        "Error message should mention unsupported format: {}",
        err_msg
    );
}

#[test]
fn test_nonexistent_file() {
    let path = Path::new("/nonexistent/path/to/file.csv");

    let result = load_dataset_with_progress(path, 100);

    assert!(result.is_err(), "Nonexistent file should return error");
}

#[test]
fn test_csv_with_missing_values() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("missing.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,,3").unwrap(); // b is missing
    writeln!(file, ",2,").unwrap(); // a and c are missing
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let (df, rows, cols, _) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 3);
    assert_eq!(cols, 3);

    let null_counts: Vec<usize> = df.get_columns().iter().map(|c| c.null_count()).collect();
    assert_eq!(null_counts, vec![1, 1, 1], "Each column should have 1 null");
}

#[test]
fn test_full_scan_schema_inference() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("inference.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "late_float").unwrap();
    for i in 0..50 {
        writeln!(file, "{}", i).unwrap();
    }
    writeln!(file, "0.5").unwrap();
    drop(file);

    // 0 scans every row, so the trailing float widens the column type
    let df = load_dataset(&csv_path, 0).unwrap().collect().unwrap();
    assert_eq!(df.height(), 51);
    assert_eq!(df.column("late_float").unwrap().dtype(), &DataType::Float64);
}

#[test]
fn test_loaded_csv_feeds_the_lift_engine() {
    let mut df = common::create_scoring_dataframe();
    let (_temp_dir, csv_path) = common::create_temp_csv(&mut df);

    let (loaded, _, _, _) = load_dataset_with_progress(&csv_path, 100).unwrap();
    let results = build_lift(&loaded, "y", &AnalysisConfig::default()).unwrap();

    assert!(results.get("signal").is_some());
    assert!(results.get("segment").is_none(), "String columns are never analyzed");
}
