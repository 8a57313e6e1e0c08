//! Correlation of each numeric feature with the target

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::dataset::{numeric_column_names, numeric_values};
use super::error::EdaError;

/// Pearson correlation between one feature and the target
#[derive(Debug, Clone, Serialize)]
pub struct TargetCorrelation {
    pub feature: String,
    /// `None` with fewer than two complete rows or a constant column
    pub correlation: Option<f64>,
    /// Rows where both the feature and the target are present
    pub n: usize,
}

/// Correlate every numeric column except `target` with `target`.
///
/// Results are sorted by absolute correlation descending, undefined
/// correlations last.
pub fn target_correlations(
    df: &DataFrame,
    target: &str,
) -> Result<Vec<TargetCorrelation>, EdaError> {
    let target_values = numeric_values(df, target)?;

    let columns: Vec<(String, Vec<Option<f64>>)> = numeric_column_names(df)
        .into_iter()
        .filter(|name| name != target)
        .map(|name| {
            let values = numeric_values(df, &name)?;
            Ok((name, values))
        })
        .collect::<Result<_, EdaError>>()?;

    let mut correlations: Vec<TargetCorrelation> = columns
        .par_iter()
        .map(|(name, values)| {
            let (correlation, n) = pearson_correlation(values, &target_values);
            TargetCorrelation {
                feature: name.clone(),
                correlation,
                n,
            }
        })
        .collect();

    correlations.sort_by(|a, b| match (a.correlation, b.correlation) {
        (Some(x), Some(y)) => y.abs().total_cmp(&x.abs()),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    Ok(correlations)
}

/// Pearson correlation over complete pairs using Welford's single-pass algorithm.
///
/// Returns the correlation (if defined) and the number of complete pairs.
pub fn pearson_correlation(xs: &[Option<f64>], ys: &[Option<f64>]) -> (Option<f64>, usize) {
    let mut n = 0usize;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut m2_x = 0.0;
    let mut m2_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n as f64;
            mean_y += dy / n as f64;
            m2_x += dx * (x - mean_x);
            m2_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2 || m2_x <= 0.0 || m2_y <= 0.0 {
        return (None, n);
    }

    let r = cov_xy / (m2_x.sqrt() * m2_y.sqrt());
    (Some(r.clamp(-1.0, 1.0)), n)
}
