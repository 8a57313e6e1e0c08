//! Missing-value imputation for target and feature columns

use serde::{Deserialize, Serialize};

use super::error::EdaError;
use super::stats::{mean, median, mode};

/// Accepted strategy names, for error messages and CLI help.
pub const IMPUTE_STRATEGIES: &str = "mean, median, most_frequent";

/// Statistic used to fill missing values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    Mean,
    #[default]
    Median,
    MostFrequent,
}

impl std::fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputeStrategy::Mean => write!(f, "mean"),
            ImputeStrategy::Median => write!(f, "median"),
            ImputeStrategy::MostFrequent => write!(f, "most_frequent"),
        }
    }
}

impl std::str::FromStr for ImputeStrategy {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(ImputeStrategy::Mean),
            "median" => Ok(ImputeStrategy::Median),
            "most_frequent" | "most-frequent" | "mode" => Ok(ImputeStrategy::MostFrequent),
            _ => Err(EdaError::UnknownMethod {
                kind: "imputation",
                value: s.to_string(),
                expected: IMPUTE_STRATEGIES,
            }),
        }
    }
}

/// What to do with a feature column that has no present values at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyColumnPolicy {
    /// Leave the column missing; the engines then skip it as insufficient data
    #[default]
    Skip,
    /// Fill every row with 0.0
    FillZero,
}

/// Value the strategy would fill with, or `None` for an all-missing column.
pub fn fill_value(values: &[Option<f64>], strategy: ImputeStrategy) -> Option<f64> {
    match strategy {
        ImputeStrategy::Mean => {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            mean(&present)
        }
        ImputeStrategy::Median => median(values),
        ImputeStrategy::MostFrequent => mode(values).map(|(v, _)| v),
    }
}

/// Fill the missing entries of one column.
///
/// Returns `None` when the column is entirely missing, since no statistic can
/// be computed for it.
pub fn impute_column(values: &[Option<f64>], strategy: ImputeStrategy) -> Option<Vec<f64>> {
    let fill = fill_value(values, strategy)?;
    Some(values.iter().map(|v| v.unwrap_or(fill)).collect())
}

/// Impute a feature column in place of its optional values, applying
/// `policy` when the column is entirely missing.
///
/// Columns without missing values are returned unchanged.
pub fn impute_feature(
    values: Vec<Option<f64>>,
    strategy: ImputeStrategy,
    policy: EmptyColumnPolicy,
) -> Vec<Option<f64>> {
    if values.iter().all(Option::is_some) {
        return values;
    }
    match impute_column(&values, strategy) {
        Some(filled) => filled.into_iter().map(Some).collect(),
        None => match policy {
            EmptyColumnPolicy::Skip => values,
            EmptyColumnPolicy::FillZero => vec![Some(0.0); values.len()],
        },
    }
}
