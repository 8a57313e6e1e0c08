//! Error type for the analysis pipeline.
//!
//! Parameter errors (`InvalidParameter`, `UnknownMethod`) are fatal to the
//! requested computation. Data-quality errors (`DegenerateLabel`,
//! `InsufficientData`) are recovered per feature by the engines and reported
//! as skipped features instead.

use polars::prelude::PolarsError;

/// Errors produced by the binarizer, binner and report builders.
#[derive(Debug, thiserror::Error)]
pub enum EdaError {
    /// Returned when a parameter is out of its valid range or missing.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable description of the constraint that failed.
        reason: String,
    },

    /// Returned when a binarization or imputation method name is not recognized.
    #[error("unknown {kind} method '{value}' (expected one of: {expected})")]
    UnknownMethod {
        /// Which family of methods was being parsed.
        kind: &'static str,
        /// The unrecognized value.
        value: String,
        /// Comma-separated list of accepted values.
        expected: &'static str,
    },

    /// Returned when the binary label collapses to a single class.
    #[error("degenerate label: {reason}")]
    DegenerateLabel {
        /// What made the label degenerate.
        reason: String,
    },

    /// Returned when a feature has too few rows or distinct values to bin.
    #[error("insufficient data: {reason}")]
    InsufficientData {
        /// What was missing.
        reason: String,
    },

    /// Returned when a named column does not exist in the dataset.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Returned when a named column exists but is not numeric.
    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// Returned by [`FeatureReports::require_any`](super::FeatureReports::require_any)
    /// when every candidate feature was skipped.
    #[error("no feature produced a valid report")]
    NoAnalyzableFeatures,

    /// Returned when the underlying dataframe operation fails.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl EdaError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EdaError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        EdaError::DegenerateLabel {
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(reason: impl Into<String>) -> Self {
        EdaError::InsufficientData {
            reason: reason.into(),
        }
    }

    /// Whether this error only disqualifies a single feature.
    ///
    /// Engines turn recoverable errors into skipped-feature entries and keep
    /// going; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EdaError::DegenerateLabel { .. } | EdaError::InsufficientData { .. }
        )
    }

    /// Short machine-friendly name of the error kind, used in exports.
    pub fn kind(&self) -> &'static str {
        match self {
            EdaError::InvalidParameter { .. } => "invalid_parameter",
            EdaError::UnknownMethod { .. } => "unknown_method",
            EdaError::DegenerateLabel { .. } => "degenerate_label",
            EdaError::InsufficientData { .. } => "insufficient_data",
            EdaError::ColumnNotFound(_) => "column_not_found",
            EdaError::NonNumericColumn(_) => "non_numeric_column",
            EdaError::NoAnalyzableFeatures => "no_analyzable_features",
            EdaError::Polars(_) => "polars",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(EdaError::degenerate("one class").is_recoverable());
        assert!(EdaError::insufficient("3 rows").is_recoverable());
        assert!(!EdaError::invalid("bin_count", "must be >= 2").is_recoverable());
        assert!(!EdaError::ColumnNotFound("x".into()).is_recoverable());
        assert!(!EdaError::NoAnalyzableFeatures.is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = EdaError::UnknownMethod {
            kind: "binarization",
            value: "mode".into(),
            expected: "median, quantile, cutoff",
        };
        assert_eq!(
            err.to_string(),
            "unknown binarization method 'mode' (expected one of: median, quantile, cutoff)"
        );
        assert_eq!(
            EdaError::invalid("quantile", "must be in (0, 1)").to_string(),
            "invalid parameter `quantile`: must be in (0, 1)"
        );
    }
}
