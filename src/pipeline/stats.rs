//! Numeric helpers over extracted feature values, shared by the binarizer, imputer and reports

/// Linear-interpolated quantile of an ascending slice (numpy's default method).
///
/// Returns `None` for an empty slice. `q` is clamped into `[0, 1]`.
/// Infinite neighbours interpolate to the infinity they approach, never NaN.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(interpolate(sorted[lower], sorted[upper], frac))
}

fn interpolate(a: f64, b: f64, frac: f64) -> f64 {
    if frac == 0.0 || a == b {
        return a;
    }
    if a.is_finite() && b.is_finite() {
        return a + (b - a) * frac;
    }
    match (a.is_infinite(), b.is_infinite()) {
        // -inf..+inf has no interpolant; take the nearer end
        (true, true) => {
            if frac < 0.5 {
                a
            } else {
                b
            }
        }
        (true, false) => a,
        _ => b,
    }
}

/// Sort the present values of a column ascending, dropping missing entries.
pub fn sorted_present(values: &[Option<f64>]) -> Vec<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(|a, b| a.total_cmp(b));
    present
}

/// Median of the present values, `None` when all are missing.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    quantile_sorted(&sorted_present(values), 0.5)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (ddof = 1), `None` with fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation (ddof = 1).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Most frequent value; ties resolve to the smallest value.
pub fn mode(values: &[Option<f64>]) -> Option<(f64, usize)> {
    let sorted = sorted_present(values);
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        let run = j - i;
        // Strictly greater keeps the earliest (smallest) value on ties
        if best.map_or(true, |(_, n)| run > n) {
            best = Some((sorted[i], run));
        }
        i = j;
    }
    best
}
