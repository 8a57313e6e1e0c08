//! JSON export of lift and IV analyses

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{AnalysisConfig, FeatureReports, IvReport, LiftReport, SkippedFeature};

/// Metadata about the analysis run
#[derive(Debug, Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (RFC 3339)
    pub timestamp: String,
    /// simply-eda version
    pub version: String,
    /// `lift` or `iv`
    pub engine: String,
    pub input_file: String,
    pub target_column: String,
    /// Full preprocessing and binning configuration
    pub settings: AnalysisConfig,
}

/// Summary statistics of the analysis
#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub features_analyzed: usize,
    pub features_skipped: usize,
    /// Average lift std for lift runs, average IV for IV runs
    pub average_score: f64,
}

/// Complete export document
#[derive(Debug, Serialize)]
pub struct AnalysisExport<'a, R: Serialize> {
    pub metadata: AnalysisMetadata,
    pub summary: AnalysisSummary,
    pub features: &'a [R],
    pub skipped: &'a [SkippedFeature],
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub target_column: &'a str,
    pub config: &'a AnalysisConfig,
}

fn average(scores: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = scores.fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn build_export<'a, R: Serialize>(
    engine: &str,
    results: &'a FeatureReports<R>,
    average_score: f64,
    params: &ExportParams,
) -> AnalysisExport<'a, R> {
    AnalysisExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            engine: engine.to_string(),
            input_file: params.input_file.to_string(),
            target_column: params.target_column.to_string(),
            settings: params.config.clone(),
        },
        summary: AnalysisSummary {
            features_analyzed: results.reports.len(),
            features_skipped: results.skipped.len(),
            average_score,
        },
        features: &results.reports,
        skipped: &results.skipped,
    }
}

fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize analysis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis to {}", output_path.display()))?;

    Ok(())
}

/// Export lift reports to a JSON file with run metadata
pub fn export_lift(
    results: &FeatureReports<LiftReport>,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let average_score = average(results.reports.iter().map(|r| r.lift_std));
    write_json(&build_export("lift", results, average_score, params), output_path)
}

/// Export IV reports to a JSON file with run metadata
pub fn export_iv(
    results: &FeatureReports<IvReport>,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let average_score = average(results.reports.iter().map(|r| r.iv));
    write_json(&build_export("iv", results, average_score, params), output_path)
}
