//! Lift analysis
//!
//! Each feature is cut into quantile bins and the good rate of every bin is
//! compared with the overall good rate (the baseline). A lift above 1 means
//! the bin concentrates good outcomes; the spread of lifts across bins
//! summarizes how strongly the feature separates the label.

use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use super::binning::quantile_bins;
use super::engine::{
    analyze_each, prepare, skip_all, AnalysisConfig, FeatureReport, FeatureReports,
};
use super::error::EdaError;
use super::stats::{mean, sample_std};

/// Features with fewer non-missing rows than this are skipped
pub const LIFT_MIN_ROWS: usize = 10;

/// Bins with a lift above this are counted as strong
pub const STRONG_LIFT: f64 = 1.2;

/// Bins with a lift below this are counted as weak
pub const WEAK_LIFT: f64 = 0.8;

/// Strength of a feature judged by the standard deviation of its bin lifts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LiftStrength {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for LiftStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiftStrength::Low => write!(f, "Low"),
            LiftStrength::Medium => write!(f, "Medium"),
            LiftStrength::High => write!(f, "High"),
        }
    }
}

/// Map the standard deviation of bin lifts to a strength category.
///
/// `σ > 0.3` is High, `0.15 < σ ≤ 0.3` is Medium, anything else (NaN
/// included) is Low.
pub fn categorize_lift_std(std: f64) -> LiftStrength {
    if std > 0.3 {
        LiftStrength::High
    } else if std > 0.15 {
        LiftStrength::Medium
    } else {
        LiftStrength::Low
    }
}

/// One quantile bin of a lift table
#[derive(Debug, Clone, Serialize)]
pub struct LiftBin {
    pub bin_label: String,
    /// Smallest feature value in the bin
    pub lower_bound: f64,
    /// Largest feature value in the bin
    pub upper_bound: f64,
    pub count: usize,
    /// Number of good labels in the bin
    pub good: usize,
    /// `good / count`
    pub good_rate: f64,
    /// `good_rate / baseline`
    pub lift: f64,
}

/// Lift analysis result for a single feature
#[derive(Debug, Clone, Serialize)]
pub struct LiftReport {
    pub feature: String,
    /// Overall good rate of the prepared label
    pub baseline: f64,
    pub bins: Vec<LiftBin>,
    /// Sample standard deviation of the bin lifts
    pub lift_std: f64,
    pub strength: LiftStrength,
    pub max_lift: f64,
    pub min_lift: f64,
    pub mean_lift: f64,
    /// Bins with lift above 1.2
    pub strong_bins: usize,
    /// Bins with lift below 0.8
    pub weak_bins: usize,
}

impl FeatureReport for LiftReport {
    fn feature(&self) -> &str {
        &self.feature
    }
}

impl LiftReport {
    /// Summarize a lift table into a report.
    pub fn from_bins(feature: impl Into<String>, baseline: f64, bins: Vec<LiftBin>) -> Self {
        let lifts: Vec<f64> = bins.iter().map(|b| b.lift).collect();
        let lift_std = sample_std(&lifts).unwrap_or(0.0);

        Self {
            feature: feature.into(),
            baseline,
            lift_std,
            strength: categorize_lift_std(lift_std),
            max_lift: lifts.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min_lift: lifts.iter().copied().fold(f64::INFINITY, f64::min),
            mean_lift: mean(&lifts).unwrap_or(f64::NAN),
            strong_bins: lifts.iter().filter(|&&l| l > STRONG_LIFT).count(),
            weak_bins: lifts.iter().filter(|&&l| l < WEAK_LIFT).count(),
            bins,
        }
    }

    /// Reports ordered by lift spread, strongest first.
    pub fn ranking(reports: &[LiftReport]) -> Vec<&LiftReport> {
        let mut ranked: Vec<&LiftReport> = reports.iter().collect();
        ranked.sort_by(|a, b| b.lift_std.total_cmp(&a.lift_std));
        ranked
    }
}

/// Build the lift table of one feature against aligned binary labels.
///
/// Rows where the feature is missing are ignored.
///
/// # Errors
/// - `DegenerateLabel` if `baseline` is not strictly between 0 and 1
/// - `InsufficientData` with fewer than 10 usable rows or fewer than 2 bins
pub fn compute_lift(
    feature: &[Option<f64>],
    labels: &[i32],
    baseline: f64,
    bin_count: usize,
) -> Result<Vec<LiftBin>, EdaError> {
    if !(baseline > 0.0 && baseline < 1.0) {
        return Err(EdaError::degenerate(format!(
            "baseline good rate {} leaves nothing to compare against",
            baseline
        )));
    }

    let present = feature.iter().filter(|v| v.is_some()).count();
    if present < LIFT_MIN_ROWS {
        return Err(EdaError::insufficient(format!(
            "{} non-missing rows, at least {} required",
            present, LIFT_MIN_ROWS
        )));
    }

    let bins = quantile_bins(feature, bin_count)?;

    let mut good = vec![0usize; bins.realized_k];
    for (assignment, &label) in bins.assignments.iter().zip(labels) {
        if let Some(bin) = assignment {
            if label == 1 {
                good[*bin] += 1;
            }
        }
    }

    Ok((0..bins.realized_k)
        .map(|i| {
            let count = bins.counts[i];
            let good_rate = good[i] as f64 / count as f64;
            LiftBin {
                bin_label: bins.label(i),
                lower_bound: bins.bounds[i].0,
                upper_bound: bins.bounds[i].1,
                count,
                good: good[i],
                good_rate,
                lift: good_rate / baseline,
            }
        })
        .collect())
}

/// Build lift reports for every candidate feature of `df` against `target`.
///
/// A single-class label skips every feature and still succeeds.
pub fn build_lift(
    df: &DataFrame,
    target: &str,
    config: &AnalysisConfig,
) -> Result<FeatureReports<LiftReport>, EdaError> {
    let prepared = prepare(df, target, config)?;

    if let Some(reason) = prepared.label_degeneracy() {
        return Ok(skip_all(&prepared, &reason));
    }
    let baseline = prepared.good_rate().unwrap_or(f64::NAN);

    let result = analyze_each(&prepared, |name, values| {
        compute_lift(values, &prepared.labels, baseline, config.bin_count)
            .map(|bins| LiftReport::from_bins(name, baseline, bins))
    })?;

    info!(
        target,
        baseline,
        analyzed = result.reports.len(),
        skipped = result.skipped.len(),
        "lift analysis complete"
    );
    Ok(result)
}
