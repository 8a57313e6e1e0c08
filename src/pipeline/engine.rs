//! Shared preprocessing and the per-feature skip contract
//!
//! Both report builders run the same preparation: optionally impute the
//! target, drop rows whose target is missing, binarize, then optionally
//! impute the candidate features. Each feature is analyzed independently;
//! data-quality failures become [`SkippedFeature`] entries while parameter
//! and dataset errors abort the run.

use polars::prelude::*;
use rayon::prelude::*;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use super::dataset::{candidate_features, numeric_values, select_rows};
use super::error::EdaError;
use super::impute::{impute_column, impute_feature, EmptyColumnPolicy, ImputeStrategy};
use super::target::{binarize, TargetBinarization};

/// Default bin count for Lift reports
pub const DEFAULT_LIFT_BINS: usize = 10;

/// Default bin count for IV reports
pub const DEFAULT_IV_BINS: usize = 4;

/// Parameters shared by the Lift and IV engines.
///
/// Every field takes part in the cache key, so two configs that compare
/// equal always produce the same reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Fill missing target values before dropping incomplete rows
    pub impute_target: bool,
    pub target_impute_strategy: ImputeStrategy,
    /// Fill missing feature values; when off, each feature only loses its own missing rows
    pub impute_features: bool,
    pub feature_impute_strategy: ImputeStrategy,
    /// Handling of feature columns with no present values
    pub empty_column_policy: EmptyColumnPolicy,
    /// Requested number of quantile bins per feature
    pub bin_count: usize,
    /// How the continuous target becomes a good/bad label
    pub binarization: TargetBinarization,
    /// Explicit feature list; `None` means every numeric column except the target
    pub features: Option<Vec<String>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            impute_target: false,
            target_impute_strategy: ImputeStrategy::Median,
            impute_features: true,
            feature_impute_strategy: ImputeStrategy::Median,
            empty_column_policy: EmptyColumnPolicy::Skip,
            bin_count: DEFAULT_LIFT_BINS,
            binarization: TargetBinarization::Median,
            features: None,
        }
    }
}

impl AnalysisConfig {
    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    pub fn with_binarization(mut self, binarization: TargetBinarization) -> Self {
        self.binarization = binarization;
        self
    }

    /// Enable target imputation with `strategy`, or disable it with `None`
    pub fn with_target_imputation(mut self, strategy: Option<ImputeStrategy>) -> Self {
        self.impute_target = strategy.is_some();
        if let Some(s) = strategy {
            self.target_impute_strategy = s;
        }
        self
    }

    /// Enable feature imputation with `strategy`, or disable it with `None`
    pub fn with_feature_imputation(mut self, strategy: Option<ImputeStrategy>) -> Self {
        self.impute_features = strategy.is_some();
        if let Some(s) = strategy {
            self.feature_impute_strategy = s;
        }
        self
    }

    pub fn with_empty_column_policy(mut self, policy: EmptyColumnPolicy) -> Self {
        self.empty_column_policy = policy;
        self
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = Some(features);
        self
    }

    /// Check parameters that are fatal to a run.
    pub fn validate(&self) -> Result<(), EdaError> {
        if self.bin_count < 2 {
            return Err(EdaError::invalid(
                "bin_count",
                format!("at least 2 bins are required, got {}", self.bin_count),
            ));
        }
        self.binarization.validate()
    }
}

/// Target-aligned data ready for per-feature analysis
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub target: String,
    /// Binary label per kept row (rows with a missing target are gone)
    pub labels: Vec<i32>,
    /// Candidate features restricted to the kept rows, in dataset order
    pub features: Vec<(String, Vec<Option<f64>>)>,
    /// Rows removed because the target was missing
    pub dropped_rows: usize,
}

impl PreparedData {
    /// Proportion of good labels, `None` when no rows were kept
    pub fn good_rate(&self) -> Option<f64> {
        if self.labels.is_empty() {
            return None;
        }
        let good = self.labels.iter().filter(|&&l| l == 1).count();
        Some(good as f64 / self.labels.len() as f64)
    }

    /// Reason the label cannot support any analysis, if there is one.
    pub fn label_degeneracy(&self) -> Option<String> {
        if self.labels.is_empty() {
            return Some(format!(
                "no rows with a non-missing '{}' remain",
                self.target
            ));
        }
        let good = self.labels.iter().filter(|&&l| l == 1).count();
        let bad = self.labels.len() - good;
        if good == 0 || bad == 0 {
            return Some(format!(
                "binarized '{}' has a single class ({} good, {} bad)",
                self.target, good, bad
            ));
        }
        None
    }

    /// Labels as optionals, the shape the IV builder consumes
    pub fn label_options(&self) -> Vec<Option<i32>> {
        self.labels.iter().copied().map(Some).collect()
    }
}

/// Run the shared preprocessing for `target` under `config`.
pub fn prepare(
    df: &DataFrame,
    target: &str,
    config: &AnalysisConfig,
) -> Result<PreparedData, EdaError> {
    config.validate()?;

    let mut target_values = numeric_values(df, target)?;
    if config.impute_target && target_values.iter().any(Option::is_none) {
        // An all-missing target stays missing and every row is dropped below
        if let Some(filled) = impute_column(&target_values, config.target_impute_strategy) {
            target_values = filled.into_iter().map(Some).collect();
        }
    }

    let keep: Vec<bool> = target_values.iter().map(Option::is_some).collect();
    let kept_target = select_rows(&target_values, &keep);
    let dropped_rows = target_values.len() - kept_target.len();

    let labels: Vec<i32> = if kept_target.is_empty() {
        Vec::new()
    } else {
        binarize(&kept_target, &config.binarization)?
            .into_iter()
            .flatten()
            .collect()
    };

    let names = candidate_features(df, target, config.features.as_deref())?;
    let mut features = Vec::with_capacity(names.len());
    for name in names {
        let values = select_rows(&numeric_values(df, &name)?, &keep);
        let values = if config.impute_features {
            impute_feature(
                values,
                config.feature_impute_strategy,
                config.empty_column_policy,
            )
        } else {
            values
        };
        features.push((name, values));
    }

    Ok(PreparedData {
        target: target.to_string(),
        labels,
        features,
        dropped_rows,
    })
}

/// Reports that carry the name of the feature they describe
pub trait FeatureReport {
    fn feature(&self) -> &str;
}

/// A feature that could not be analyzed, with the reason
#[derive(Debug)]
pub struct SkippedFeature {
    pub feature: String,
    pub reason: EdaError,
}

impl Serialize for SkippedFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SkippedFeature", 3)?;
        s.serialize_field("feature", &self.feature)?;
        s.serialize_field("kind", self.reason.kind())?;
        s.serialize_field("reason", &self.reason.to_string())?;
        s.end()
    }
}

/// Per-feature outcome of an engine run: analyzed reports plus skips
#[derive(Debug, Serialize)]
pub struct FeatureReports<R> {
    /// Successful reports in candidate-column order
    pub reports: Vec<R>,
    /// Features omitted because of a data-quality condition
    pub skipped: Vec<SkippedFeature>,
}

impl<R> Default for FeatureReports<R> {
    fn default() -> Self {
        Self {
            reports: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<R: FeatureReport> FeatureReports<R> {
    /// True when no feature produced a report
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Report for `feature`, if it was analyzed
    pub fn get(&self, feature: &str) -> Option<&R> {
        self.reports.iter().find(|r| r.feature() == feature)
    }

    /// Why `feature` was skipped, if it was
    pub fn skip_reason(&self, feature: &str) -> Option<&EdaError> {
        self.skipped
            .iter()
            .find(|s| s.feature == feature)
            .map(|s| &s.reason)
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.feature()).collect()
    }

    /// Fail with `NoAnalyzableFeatures` when every candidate was skipped.
    pub fn require_any(self) -> Result<Self, EdaError> {
        if self.is_empty() {
            Err(EdaError::NoAnalyzableFeatures)
        } else {
            Ok(self)
        }
    }
}

/// Mark every prepared feature as skipped with the same degenerate-label reason.
pub(crate) fn skip_all<R>(prepared: &PreparedData, reason: &str) -> FeatureReports<R> {
    let skipped = prepared
        .features
        .iter()
        .map(|(name, _)| {
            debug!(feature = %name, reason, "feature skipped");
            SkippedFeature {
                feature: name.clone(),
                reason: EdaError::degenerate(reason),
            }
        })
        .collect();

    FeatureReports {
        reports: Vec::new(),
        skipped,
    }
}

/// Analyze every prepared feature in parallel, keeping candidate order.
///
/// Recoverable errors are recorded as skips; the first fatal error in
/// candidate order is returned.
pub(crate) fn analyze_each<R, F>(
    prepared: &PreparedData,
    analyze: F,
) -> Result<FeatureReports<R>, EdaError>
where
    R: Send,
    F: Fn(&str, &[Option<f64>]) -> Result<R, EdaError> + Sync,
{
    let outcomes: Vec<(String, Result<R, EdaError>)> = prepared
        .features
        .par_iter()
        .map(|(name, values)| (name.clone(), analyze(name, values)))
        .collect();

    let mut result = FeatureReports::default();
    for (feature, outcome) in outcomes {
        match outcome {
            Ok(report) => result.reports.push(report),
            Err(reason) if reason.is_recoverable() => {
                debug!(feature = %feature, reason = %reason, "feature skipped");
                result.skipped.push(SkippedFeature { feature, reason });
            }
            Err(fatal) => return Err(fatal),
        }
    }

    Ok(result)
}
