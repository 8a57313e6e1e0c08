//! Rank-based quantile binning
//!
//! Values are ranked with "first" semantics (ties broken by row order) and
//! the ranks are cut into `k` equal-population intervals. Working on ranks
//! rather than raw values keeps bin populations even under heavy skew and
//! repeated values. Duplicate edges are dropped and empty intervals are not
//! realized, so fewer than `k` bins can come back.

use serde::Serialize;

use super::error::EdaError;

/// Result of binning one feature column
#[derive(Debug, Clone, Serialize)]
pub struct QuantileBins {
    /// Realized bin index per input row; `None` where the value is missing
    pub assignments: Vec<Option<usize>>,
    /// Number of non-empty bins, at most the requested `k`
    pub realized_k: usize,
    /// Smallest and largest feature value in each realized bin
    pub bounds: Vec<(f64, f64)>,
    /// Row count of each realized bin
    pub counts: Vec<usize>,
}

impl QuantileBins {
    /// Display label of a realized bin, e.g. `[1.5, 7]`
    pub fn label(&self, bin: usize) -> String {
        let (lower, upper) = self.bounds[bin];
        format!("[{}, {}]", format_bound(lower), format_bound(upper))
    }
}

/// Format a bin boundary with at most four decimals and no trailing zeros
pub fn format_bound(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Edges of `k` equal-population intervals over ranks `1..=n`, deduplicated.
fn rank_edges(n: usize, k: usize) -> Vec<f64> {
    let mut edges: Vec<f64> = (0..=k)
        .map(|i| 1.0 + ((n - 1) * i) as f64 / k as f64)
        .collect();
    edges.dedup();
    edges
}

/// Bin the present values of `values` into at most `k` quantile groups.
///
/// # Errors
/// - `InvalidParameter` if `k < 2`
/// - `InsufficientData` if fewer than two non-empty bins can be formed
pub fn quantile_bins(values: &[Option<f64>], k: usize) -> Result<QuantileBins, EdaError> {
    if k < 2 {
        return Err(EdaError::invalid(
            "bin_count",
            format!("at least 2 bins are required, got {}", k),
        ));
    }

    // Stable sort keeps row order among equal values ("first" ranking)
    let mut order: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|x| (i, x)))
        .collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1));

    let n = order.len();
    if n < 2 {
        return Err(EdaError::insufficient(format!(
            "{} non-missing value(s), cannot form 2 bins",
            n
        )));
    }

    let edges = rank_edges(n, k);
    if edges.len() < 3 {
        return Err(EdaError::insufficient("fewer than 2 distinct bin edges"));
    }

    // Right-closed intervals; the first interval includes its lower edge
    let raw_bins: Vec<usize> = (1..=n)
        .map(|rank| {
            let r = rank as f64;
            edges.partition_point(|&e| e < r).max(1) - 1
        })
        .collect();

    let mut assignments = vec![None; values.len()];
    let mut bounds: Vec<(f64, f64)> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut last_raw: Option<usize> = None;

    for (&(row, value), &raw) in order.iter().zip(&raw_bins) {
        if last_raw != Some(raw) {
            bounds.push((value, value));
            counts.push(0);
            last_raw = Some(raw);
        }
        let bin = counts.len() - 1;
        counts[bin] += 1;
        bounds[bin].1 = value;
        assignments[row] = Some(bin);
    }

    let realized_k = counts.len();
    if realized_k < 2 {
        return Err(EdaError::insufficient(format!(
            "only {} bin could be formed",
            realized_k
        )));
    }

    Ok(QuantileBins {
        assignments,
        realized_k,
        bounds,
        counts,
    })
}

/// Number of distinct present values in a column
pub fn distinct_count(values: &[Option<f64>]) -> usize {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(|a, b| a.total_cmp(b));
    present.dedup();
    present.len()
}
