//! Target binarization
//!
//! Converts a continuous target column into a 0/1 label (1 = "good") by
//! comparing each value against a threshold derived from one of three
//! policies: the median, an arbitrary quantile, or a fixed cutoff.

use serde::{Deserialize, Serialize};

use super::error::EdaError;
use super::stats::{quantile_sorted, sorted_present};

/// Accepted method names, for error messages and CLI help.
pub const BINARIZATION_METHODS: &str = "median, quantile, cutoff";

/// Quantile used when the `quantile` method is selected without a value
pub const DEFAULT_TARGET_QUANTILE: f64 = 0.5;

/// Policy for turning the raw target into a binary label
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum TargetBinarization {
    /// `value >= median(target)` is good
    #[default]
    Median,
    /// `value >= quantile(target, q)` is good, with `q` in (0, 1)
    Quantile { q: f64 },
    /// `value >= cutoff` is good
    Cutoff { value: f64 },
}

impl std::fmt::Display for TargetBinarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetBinarization::Median => write!(f, "median"),
            TargetBinarization::Quantile { q } => write!(f, "quantile({})", q),
            TargetBinarization::Cutoff { value } => write!(f, "cutoff({})", value),
        }
    }
}

impl TargetBinarization {
    /// Build a policy from a method name and its optional parameters.
    ///
    /// `quantile` defaults to 0.5 when omitted; `cutoff` has no default and
    /// fails with `InvalidParameter` when absent.
    pub fn from_parts(
        method: &str,
        cutoff: Option<f64>,
        quantile: Option<f64>,
    ) -> Result<Self, EdaError> {
        let policy = match method.trim().to_lowercase().as_str() {
            "median" => TargetBinarization::Median,
            "quantile" => TargetBinarization::Quantile {
                q: quantile.unwrap_or(DEFAULT_TARGET_QUANTILE),
            },
            "cutoff" => match cutoff {
                Some(value) => TargetBinarization::Cutoff { value },
                None => {
                    return Err(EdaError::invalid(
                        "cutoff",
                        "a cutoff value must be provided when method is 'cutoff'",
                    ))
                }
            },
            _ => {
                return Err(EdaError::UnknownMethod {
                    kind: "binarization",
                    value: method.to_string(),
                    expected: BINARIZATION_METHODS,
                })
            }
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the policy parameters.
    pub fn validate(&self) -> Result<(), EdaError> {
        match *self {
            TargetBinarization::Median => Ok(()),
            TargetBinarization::Quantile { q } => {
                if q > 0.0 && q < 1.0 {
                    Ok(())
                } else {
                    Err(EdaError::invalid(
                        "quantile",
                        format!("must be strictly between 0 and 1, got {}", q),
                    ))
                }
            }
            TargetBinarization::Cutoff { value } => {
                if value.is_finite() {
                    Ok(())
                } else {
                    Err(EdaError::invalid(
                        "cutoff",
                        format!("must be a finite number, got {}", value),
                    ))
                }
            }
        }
    }

    /// Threshold this policy yields for the given target values.
    ///
    /// Median and quantile are computed over present values only and fail
    /// with `DegenerateLabel` when there are none.
    pub fn threshold(&self, values: &[Option<f64>]) -> Result<f64, EdaError> {
        self.validate()?;
        let q = match *self {
            TargetBinarization::Cutoff { value } => return Ok(value),
            TargetBinarization::Median => 0.5,
            TargetBinarization::Quantile { q } => q,
        };
        quantile_sorted(&sorted_present(values), q).ok_or_else(|| {
            EdaError::degenerate("target has no non-missing values to derive a threshold from")
        })
    }
}

/// Binarize target values: `Some(1)` where `value >= threshold`, `Some(0)`
/// below it, and `None` where the target is missing.
///
/// The output is aligned to the input positions and the input is untouched.
pub fn binarize(
    values: &[Option<f64>],
    method: &TargetBinarization,
) -> Result<Vec<Option<i32>>, EdaError> {
    let threshold = method.threshold(values)?;

    Ok(values
        .iter()
        .map(|v| v.map(|x| if x >= threshold { 1 } else { 0 }))
        .collect())
}

/// Count good (1), bad (0) and missing labels
pub fn count_labels(labels: &[Option<i32>]) -> (usize, usize, usize) {
    let good = labels.iter().filter(|v| **v == Some(1)).count();
    let bad = labels.iter().filter(|v| **v == Some(0)).count();
    let missing = labels.iter().filter(|v| v.is_none()).count();
    (good, bad, missing)
}
