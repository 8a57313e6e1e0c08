//! Information Value (IV) and Weight of Evidence (WoE) analysis
//!
//! This module cuts each feature into quantile bins and measures how
//! differently good and bad outcomes distribute over them. WoE is the log
//! ratio of the two distributions per bin and IV sums the weighted WoE
//! across bins into one predictive-power score per feature.

use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use super::binning::{distinct_count, quantile_bins};
use super::engine::{
    analyze_each, prepare, skip_all, AnalysisConfig, FeatureReport, FeatureReports,
};
use super::error::EdaError;
use super::stats::mean;

/// Added to both distributions so an empty side never produces `ln(0)`
pub const WOE_EPSILON: f64 = 1e-10;

/// Features with fewer distinct values than this are skipped
pub const IV_MIN_DISTINCT: usize = 5;

/// Predictive-power category of an IV score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IvStrength {
    NotUseful,
    Weak,
    Medium,
    Strong,
    Suspicious,
}

impl std::fmt::Display for IvStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IvStrength::NotUseful => write!(f, "Not useful"),
            IvStrength::Weak => write!(f, "Weak"),
            IvStrength::Medium => write!(f, "Medium"),
            IvStrength::Strong => write!(f, "Strong"),
            IvStrength::Suspicious => write!(f, "Suspicious / too good"),
        }
    }
}

/// Categorize an IV score.
///
/// | IV            | Category              |
/// |---------------|-----------------------|
/// | < 0.02        | Not useful            |
/// | 0.02 .. 0.1   | Weak                  |
/// | 0.1 .. 0.3    | Medium                |
/// | 0.3 .. 0.5    | Strong                |
/// | ≥ 0.5         | Suspicious / too good |
pub fn categorize_iv(iv: f64) -> IvStrength {
    if iv < 0.02 {
        IvStrength::NotUseful
    } else if iv < 0.1 {
        IvStrength::Weak
    } else if iv < 0.3 {
        IvStrength::Medium
    } else if iv < 0.5 {
        IvStrength::Strong
    } else {
        IvStrength::Suspicious
    }
}

/// A single bin with WoE statistics
#[derive(Debug, Clone, Serialize)]
pub struct IvBin {
    pub bin_label: String,
    /// Smallest feature value in the bin
    pub lower_bound: f64,
    /// Largest feature value in the bin
    pub upper_bound: f64,
    pub count: usize,
    /// Rows with label 1
    pub good: usize,
    /// Rows with label 0
    pub bad: usize,
    /// Share of all good rows that fall in this bin
    pub dist_good: f64,
    /// Share of all bad rows that fall in this bin
    pub dist_bad: f64,
    pub woe: f64,
    /// Contribution of this bin to the feature's IV
    pub iv_bin: f64,
}

/// Binned WoE table and its total IV, before any feature context is attached
#[derive(Debug, Clone, Serialize)]
pub struct IvTable {
    pub bins: Vec<IvBin>,
    pub iv: f64,
}

/// Complete IV analysis results for a single feature
#[derive(Debug, Clone, Serialize)]
pub struct IvReport {
    pub feature: String,
    pub bins: Vec<IvBin>,
    /// Total Information Value
    pub iv: f64,
    pub strength: IvStrength,
    pub max_woe: f64,
    pub min_woe: f64,
    pub mean_woe: f64,
}

impl FeatureReport for IvReport {
    fn feature(&self) -> &str {
        &self.feature
    }
}

impl IvReport {
    pub fn from_table(feature: impl Into<String>, table: IvTable) -> Self {
        let woes: Vec<f64> = table.bins.iter().map(|b| b.woe).collect();
        Self {
            feature: feature.into(),
            strength: categorize_iv(table.iv),
            max_woe: woes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min_woe: woes.iter().copied().fold(f64::INFINITY, f64::min),
            mean_woe: mean(&woes).unwrap_or(f64::NAN),
            iv: table.iv,
            bins: table.bins,
        }
    }

    /// Reports ordered by IV, highest first.
    pub fn ranking(reports: &[IvReport]) -> Vec<&IvReport> {
        let mut ranked: Vec<&IvReport> = reports.iter().collect();
        ranked.sort_by(|a, b| b.iv.total_cmp(&a.iv));
        ranked
    }
}

/// Calculate WoE and IV contribution for one bin.
///
/// Returns `(woe, iv_bin)`.
fn calculate_woe_iv(dist_good: f64, dist_bad: f64) -> (f64, f64) {
    let woe = ((dist_good + WOE_EPSILON) / (dist_bad + WOE_EPSILON)).ln();
    (woe, (dist_good - dist_bad) * woe)
}

/// Compute the WoE table of `feature` against a 0/1 `label`.
///
/// Rows missing either value are dropped first.
///
/// # Errors
/// - `DegenerateLabel` if a label outside {0, 1} appears, or if either class
///   is absent after dropping missing rows
/// - `InsufficientData` if fewer than two bins can be formed
pub fn compute_iv(
    feature: &[Option<f64>],
    label: &[Option<i32>],
    bin_count: usize,
) -> Result<IvTable, EdaError> {
    let mut values = Vec::with_capacity(feature.len());
    let mut labels = Vec::with_capacity(feature.len());
    for (v, l) in feature.iter().zip(label) {
        if let (Some(v), Some(l)) = (v, l) {
            if *l != 0 && *l != 1 {
                return Err(EdaError::degenerate(format!(
                    "label must be 0 or 1, found {}",
                    l
                )));
            }
            values.push(Some(*v));
            labels.push(*l);
        }
    }

    let bins = quantile_bins(&values, bin_count)?;

    let mut good = vec![0usize; bins.realized_k];
    let mut bad = vec![0usize; bins.realized_k];
    for (assignment, &l) in bins.assignments.iter().zip(&labels) {
        if let Some(bin) = assignment {
            if l == 1 {
                good[*bin] += 1;
            } else {
                bad[*bin] += 1;
            }
        }
    }

    let total_good: usize = good.iter().sum();
    let total_bad: usize = bad.iter().sum();
    if total_good == 0 || total_bad == 0 {
        return Err(EdaError::degenerate(format!(
            "feature rows hold a single class ({} good, {} bad)",
            total_good, total_bad
        )));
    }

    let mut iv = 0.0;
    let iv_bins = (0..bins.realized_k)
        .map(|i| {
            let dist_good = good[i] as f64 / total_good as f64;
            let dist_bad = bad[i] as f64 / total_bad as f64;
            let (woe, iv_bin) = calculate_woe_iv(dist_good, dist_bad);
            iv += iv_bin;
            IvBin {
                bin_label: bins.label(i),
                lower_bound: bins.bounds[i].0,
                upper_bound: bins.bounds[i].1,
                count: bins.counts[i],
                good: good[i],
                bad: bad[i],
                dist_good,
                dist_bad,
                woe,
                iv_bin,
            }
        })
        .collect();

    Ok(IvTable { bins: iv_bins, iv })
}

/// Build IV reports for every candidate feature of `df` against `target`.
///
/// Features with fewer than five distinct values are skipped, as are
/// features whose table cannot be computed for a data-quality reason.
pub fn build_iv(
    df: &DataFrame,
    target: &str,
    config: &AnalysisConfig,
) -> Result<FeatureReports<IvReport>, EdaError> {
    let prepared = prepare(df, target, config)?;

    if let Some(reason) = prepared.label_degeneracy() {
        return Ok(skip_all(&prepared, &reason));
    }
    let labels = prepared.label_options();

    let result = analyze_each(&prepared, |name, values| {
        let distinct = distinct_count(values);
        if distinct < IV_MIN_DISTINCT {
            return Err(EdaError::insufficient(format!(
                "{} distinct value(s), at least {} required",
                distinct, IV_MIN_DISTINCT
            )));
        }
        compute_iv(values, &labels, config.bin_count).map(|table| IvReport::from_table(name, table))
    })?;

    info!(
        target,
        analyzed = result.reports.len(),
        skipped = result.skipped.len(),
        "iv analysis complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_woe_iv_calculation() {
        // Equal distributions carry no evidence
        let (woe, iv) = calculate_woe_iv(0.25, 0.25);
        assert!(woe.abs() < 1e-12);
        assert!(iv.abs() < 1e-12);

        let (woe, iv) = calculate_woe_iv(0.4, 0.1);
        assert!((woe - 4.0f64.ln()).abs() < 1e-6);
        assert!(iv > 0.0, "IV contribution should be non-negative");
    }

    #[test]
    fn test_epsilon_keeps_empty_side_finite() {
        let (woe, iv) = calculate_woe_iv(0.0, 0.5);
        assert!(woe.is_finite());
        assert!(woe < 0.0);
        assert!(iv.is_finite() && iv > 0.0);
    }

    #[test]
    fn test_categorize_iv_boundaries() {
        assert_eq!(categorize_iv(0.0), IvStrength::NotUseful);
        assert_eq!(categorize_iv(0.019), IvStrength::NotUseful);
        assert_eq!(categorize_iv(0.02), IvStrength::Weak);
        assert_eq!(categorize_iv(0.1), IvStrength::Medium);
        assert_eq!(categorize_iv(0.3), IvStrength::Strong);
        assert_eq!(categorize_iv(0.5), IvStrength::Suspicious);
        assert_eq!(IvStrength::Suspicious.to_string(), "Suspicious / too good");
        assert_eq!(IvStrength::NotUseful.to_string(), "Not useful");
    }

    #[test]
    fn test_compute_iv_table_totals() {
        let feature: Vec<Option<f64>> = (1..=8).map(|i| Some(i as f64)).collect();
        let label = vec![Some(0), Some(0), Some(1), Some(0), Some(1), Some(0), Some(1), Some(1)];

        let table = compute_iv(&feature, &label, 2).unwrap();
        assert_eq!(table.bins.len(), 2);

        let dg: f64 = table.bins.iter().map(|b| b.dist_good).sum();
        let db: f64 = table.bins.iter().map(|b| b.dist_bad).sum();
        assert!((dg - 1.0).abs() < 1e-12);
        assert!((db - 1.0).abs() < 1e-12);

        let sum: f64 = table.bins.iter().map(|b| b.iv_bin).sum();
        assert!((table.iv - sum).abs() < 1e-12);
        assert!(table.iv >= 0.0);

        // first bin holds 1..=4: one good, three bad
        assert_eq!((table.bins[0].good, table.bins[0].bad), (1, 3));
    }

    #[test]
    fn test_compute_iv_drops_missing_rows() {
        let feature = vec![Some(1.0), None, Some(2.0), Some(3.0), Some(4.0)];
        let label = vec![Some(0), Some(1), None, Some(1), Some(0)];

        let table = compute_iv(&feature, &label, 2).unwrap();
        let total: usize = table.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_compute_iv_rejects_non_binary_label() {
        let feature = vec![Some(1.0), Some(2.0), Some(3.0)];
        let label = vec![Some(0), Some(2), Some(1)];
        assert!(matches!(
            compute_iv(&feature, &label, 2),
            Err(EdaError::DegenerateLabel { .. })
        ));
    }

    #[test]
    fn test_compute_iv_single_class() {
        let feature: Vec<Option<f64>> = (1..=6).map(|i| Some(i as f64)).collect();
        let label = vec![Some(1); 6];
        assert!(matches!(
            compute_iv(&feature, &label, 3),
            Err(EdaError::DegenerateLabel { .. })
        ));
    }

    #[test]
    fn test_build_iv_skips_low_cardinality() {
        let df = df! {
            "y" => (0..40).map(|i| i as f64).collect::<Vec<_>>(),
            "x" => (0..40).map(|i| (i * 7 % 11) as f64).collect::<Vec<_>>(),
            "flag" => (0..40).map(|i| (i % 3) as f64).collect::<Vec<_>>(),
        }
        .unwrap();

        let config = AnalysisConfig::default().with_bin_count(4);
        let result = build_iv(&df, "y", &config).unwrap();

        let report = result.get("x").unwrap();
        assert_eq!(report.bins.len(), 4);
        assert_eq!(report.strength, categorize_iv(report.iv));
        assert!(matches!(
            result.skip_reason("flag"),
            Some(EdaError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_build_iv_constant_target_skips_everything() {
        let df = df! {
            "y" => [1.0f64; 12],
            "x" => (0..12).map(|i| i as f64).collect::<Vec<_>>(),
        }
        .unwrap();

        let result = build_iv(&df, "y", &AnalysisConfig::default().with_bin_count(4)).unwrap();
        assert!(result.is_empty());
        assert!(matches!(
            result.skip_reason("x"),
            Some(EdaError::DegenerateLabel { .. })
        ));
    }

    #[test]
    fn test_ranking_orders_by_iv() {
        let make = |name: &str, iv: f64| {
            IvReport::from_table(name, IvTable { bins: Vec::new(), iv })
        };
        let reports = vec![make("a", 0.05), make("b", 0.4), make("c", 0.2)];
        let names: Vec<&str> = IvReport::ranking(&reports)
            .iter()
            .map(|r| r.feature.as_str())
            .collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }
}
