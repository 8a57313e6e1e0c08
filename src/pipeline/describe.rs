//! Univariate column summary with percentile-based outlier counts

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::error::EdaError;
use super::stats::mode;

/// Columns at or above this missing percentage count as high-missing in [`SummaryKpis`]
pub const HIGH_MISSING_PCT: f64 = 50.0;

/// Descriptive statistics of one column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub is_numeric: bool,
    /// Distinct non-missing values
    pub n_unique: usize,
    pub n_missing: usize,
    pub pct_missing: f64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub variance: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Most frequent value rendered as text, smallest value on ties
    pub top_value: Option<String>,
    pub top_freq: usize,
    /// Value at the lower percentile
    pub lower_bound: Option<f64>,
    /// Value at the upper percentile
    pub upper_bound: Option<f64>,
    /// Present values strictly outside `[lower_bound, upper_bound]`
    pub n_outliers: Option<usize>,
    /// Outliers as a percentage of the full column length
    pub pct_outliers: Option<f64>,
}

/// Summarize every column of `df`.
///
/// `lower_pct` and `upper_pct` are percentiles in `[0, 100]` bounding the
/// non-outlier range of numeric columns.
pub fn describe_columns(
    df: &DataFrame,
    lower_pct: f64,
    upper_pct: f64,
) -> Result<Vec<ColumnSummary>, EdaError> {
    if !(0.0..=100.0).contains(&lower_pct)
        || !(0.0..=100.0).contains(&upper_pct)
        || lower_pct >= upper_pct
    {
        return Err(EdaError::invalid(
            "percentiles",
            format!(
                "need 0 <= lower < upper <= 100, got lower={} upper={}",
                lower_pct, upper_pct
            ),
        ));
    }

    df.get_columns()
        .iter()
        .map(|col| {
            if col.dtype().is_primitive_numeric() {
                describe_numeric(col, lower_pct, upper_pct)
            } else {
                describe_other(col)
            }
        })
        .collect()
}

fn pct(part: usize, len: usize) -> f64 {
    if len == 0 {
        0.0
    } else {
        part as f64 * 100.0 / len as f64
    }
}

fn describe_numeric(
    col: &Column,
    lower_pct: f64,
    upper_pct: f64,
) -> Result<ColumnSummary, EdaError> {
    let values: Vec<Option<f64>> = col
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    let len = values.len();

    let present = Float64Chunked::from_vec(
        col.name().clone(),
        values.iter().flatten().copied().collect(),
    );
    let n_missing = len - present.len();

    let lower_bound = present.quantile(lower_pct / 100.0, QuantileMethod::Linear)?;
    let upper_bound = present.quantile(upper_pct / 100.0, QuantileMethod::Linear)?;
    let n_outliers = match (lower_bound, upper_bound) {
        (Some(lo), Some(hi)) => Some(
            values
                .iter()
                .flatten()
                .filter(|&&v| v < lo || v > hi)
                .count(),
        ),
        _ => None,
    };

    let variance = if present.len() < 2 { None } else { present.var(1) };
    let top = mode(&values);

    Ok(ColumnSummary {
        name: col.name().to_string(),
        dtype: col.dtype().to_string(),
        is_numeric: true,
        n_unique: present.n_unique()?,
        n_missing,
        pct_missing: pct(n_missing, len),
        mean: present.mean(),
        median: present.median(),
        variance,
        std: variance.map(f64::sqrt),
        min: present.min(),
        max: present.max(),
        top_value: top.map(|(v, _)| v.to_string()),
        top_freq: top.map_or(0, |(_, n)| n),
        lower_bound,
        upper_bound,
        n_outliers,
        pct_outliers: n_outliers.map(|n| pct(n, len)),
    })
}

fn describe_other(col: &Column) -> Result<ColumnSummary, EdaError> {
    let as_text = col.cast(&DataType::String)?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut n_missing = 0;
    for value in as_text.str()?.into_iter() {
        match value {
            Some(v) => *counts.entry(v.to_string()).or_insert(0) += 1,
            None => n_missing += 1,
        }
    }

    // BTreeMap iterates in ascending order, so the first maximum is the smallest value
    let mut top: Option<(&String, usize)> = None;
    for (value, &n) in &counts {
        if top.map_or(true, |(_, best)| n > best) {
            top = Some((value, n));
        }
    }

    let len = col.len();
    Ok(ColumnSummary {
        name: col.name().to_string(),
        dtype: col.dtype().to_string(),
        is_numeric: false,
        n_unique: counts.len(),
        n_missing,
        pct_missing: pct(n_missing, len),
        mean: None,
        median: None,
        variance: None,
        std: None,
        min: None,
        max: None,
        top_value: top.map(|(v, _)| v.clone()),
        top_freq: top.map_or(0, |(_, n)| n),
        lower_bound: None,
        upper_bound: None,
        n_outliers: None,
        pct_outliers: None,
    })
}

/// Column filter applied to a summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryFilter {
    /// Keep columns with at least this many distinct values
    pub min_unique: usize,
    pub numeric_only: bool,
    /// Keep columns with at most this missing percentage
    pub max_missing_pct: f64,
    /// Keep numeric columns with at least this variance; undefined variance always passes
    pub min_variance: f64,
}

impl Default for SummaryFilter {
    fn default() -> Self {
        Self {
            min_unique: 2,
            numeric_only: true,
            max_missing_pct: 80.0,
            min_variance: 0.0,
        }
    }
}

impl SummaryFilter {
    pub fn apply(&self, summaries: &[ColumnSummary]) -> Vec<ColumnSummary> {
        summaries
            .iter()
            .filter(|s| s.n_unique >= self.min_unique)
            .filter(|s| !self.numeric_only || s.is_numeric)
            .filter(|s| s.pct_missing <= self.max_missing_pct)
            .filter(|s| s.variance.map_or(true, |v| v >= self.min_variance))
            .cloned()
            .collect()
    }
}

/// Headline counts over a summary table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryKpis {
    pub numeric_columns: usize,
    pub non_numeric_columns: usize,
    /// Columns with at least 50% missing
    pub high_missing_columns: usize,
    /// Columns holding a single distinct value
    pub constant_columns: usize,
}

impl SummaryKpis {
    pub fn from_summaries(summaries: &[ColumnSummary]) -> Self {
        let numeric_columns = summaries.iter().filter(|s| s.is_numeric).count();
        Self {
            numeric_columns,
            non_numeric_columns: summaries.len() - numeric_columns,
            high_missing_columns: summaries
                .iter()
                .filter(|s| s.pct_missing >= HIGH_MISSING_PCT)
                .count(),
            constant_columns: summaries.iter().filter(|s| s.n_unique == 1).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df! {
            "x" => [Some(1.0f64), Some(2.0), Some(2.0), None, Some(100.0)],
            "c" => [Some("b"), Some("a"), Some("b"), Some("a"), None],
            "k" => [3i64, 3, 3, 3, 3],
        }
        .unwrap()
    }

    #[test]
    fn test_numeric_summary() {
        let summaries = describe_columns(&sample_df(), 5.0, 95.0).unwrap();
        let x = &summaries[0];

        assert!(x.is_numeric);
        assert_eq!(x.n_unique, 3);
        assert_eq!(x.n_missing, 1);
        assert_eq!(x.pct_missing, 20.0);
        assert_eq!(x.median, Some(2.0));
        assert_eq!(x.min, Some(1.0));
        assert_eq!(x.max, Some(100.0));
        assert_eq!(x.top_value.as_deref(), Some("2"));
        assert_eq!(x.top_freq, 2);
        // The 5th and 95th percentiles exclude the minimum and the maximum
        assert_eq!(x.n_outliers, Some(2));
        assert_eq!(x.pct_outliers, Some(40.0));
    }

    #[test]
    fn test_numeric_summary_with_infinite_values() {
        let df = df! { "v" => [1.0f64, f64::INFINITY, f64::INFINITY] }.unwrap();
        let v = &describe_columns(&df, 0.0, 100.0).unwrap()[0];

        assert_eq!(v.median, Some(f64::INFINITY));
        assert_eq!(v.max, Some(f64::INFINITY));
        assert_eq!(v.n_unique, 2);
        assert_eq!(v.n_outliers, Some(0));
    }

    #[test]
    fn test_single_value_has_no_variance() {
        let df = df! { "v" => [Some(4.0f64), None] }.unwrap();
        let v = &describe_columns(&df, 5.0, 95.0).unwrap()[0];
        assert_eq!(v.variance, None);
        assert_eq!(v.std, None);
        assert_eq!(v.mean, Some(4.0));
    }

    #[test]
    fn test_string_summary_ties_pick_smallest() {
        let summaries = describe_columns(&sample_df(), 5.0, 95.0).unwrap();
        let c = &summaries[1];

        assert!(!c.is_numeric);
        assert_eq!(c.n_unique, 2);
        assert_eq!(c.n_missing, 1);
        assert_eq!(c.top_value.as_deref(), Some("a"));
        assert_eq!(c.top_freq, 2);
        assert_eq!(c.variance, None);
        assert_eq!(c.n_outliers, None);
    }

    #[test]
    fn test_percentile_validation() {
        let df = sample_df();
        for (lo, hi) in [(95.0, 5.0), (-1.0, 50.0), (10.0, 101.0), (50.0, 50.0)] {
            assert!(matches!(
                describe_columns(&df, lo, hi),
                Err(EdaError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_filter_defaults() {
        let summaries = describe_columns(&sample_df(), 5.0, 95.0).unwrap();
        let kept = SummaryFilter::default().apply(&summaries);
        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        // "c" is not numeric and "k" is constant
        assert_eq!(names, vec!["x"]);

        let all_types = SummaryFilter {
            numeric_only: false,
            min_unique: 1,
            ..SummaryFilter::default()
        };
        assert_eq!(all_types.apply(&summaries).len(), 3);
    }

    #[test]
    fn test_kpis() {
        let summaries = describe_columns(&sample_df(), 5.0, 95.0).unwrap();
        let kpis = SummaryKpis::from_summaries(&summaries);
        assert_eq!(
            kpis,
            SummaryKpis {
                numeric_columns: 2,
                non_numeric_columns: 1,
                high_missing_columns: 0,
                constant_columns: 1,
            }
        );
    }
}
