//! Pipeline module - preparation, binning and the report engines

pub mod binning;
pub mod cache;
pub mod correlation;
pub mod dataset;
pub mod describe;
pub mod engine;
pub mod error;
pub mod impute;
pub mod iv;
pub mod lift;
pub mod loader;
pub mod stats;
pub mod target;

pub use binning::{distinct_count, format_bound, quantile_bins, QuantileBins};
pub use cache::{AnalysisCache, CacheKey, CacheStats, Engine};
pub use correlation::{pearson_correlation, target_correlations, TargetCorrelation};
pub use dataset::{candidate_features, numeric_column_names, numeric_values};
pub use describe::{describe_columns, ColumnSummary, SummaryFilter, SummaryKpis};
pub use engine::{
    prepare, AnalysisConfig, FeatureReport, FeatureReports, PreparedData, SkippedFeature,
    DEFAULT_IV_BINS, DEFAULT_LIFT_BINS,
};
pub use error::EdaError;
pub use impute::{impute_column, impute_feature, EmptyColumnPolicy, ImputeStrategy};
pub use iv::{build_iv, categorize_iv, compute_iv, IvBin, IvReport, IvStrength, IvTable};
pub use lift::{build_lift, categorize_lift_std, compute_lift, LiftBin, LiftReport, LiftStrength};
pub use loader::{get_column_names, load_dataset, load_dataset_with_progress, FileFormat};
pub use target::{binarize, count_labels, TargetBinarization};
