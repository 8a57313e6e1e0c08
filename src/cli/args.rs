//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{
    AnalysisConfig, EdaError, EmptyColumnPolicy, ImputeStrategy, SummaryFilter,
    TargetBinarization, DEFAULT_IV_BINS, DEFAULT_LIFT_BINS,
};

/// simply-eda - Binning, lift and information value analysis for tabular data
#[derive(Parser, Debug)]
#[command(name = "simply-eda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all diagnostics except errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true, value_parser = validate_threads)]
    pub threads: Option<usize>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, global = true, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lift of every numeric feature over quantile bins (deciles by default)
    Lift(EngineArgs),

    /// Weight of Evidence and Information Value of every numeric feature
    Iv(EngineArgs),

    /// Univariate summary of every column with outlier counts
    Summary(SummaryArgs),

    /// Pearson correlation of every numeric column with the target
    Correlations(CorrelationArgs),

    /// Interactive session that reuses cached results between questions
    Explore(ExploreArgs),
}

/// Arguments shared by the lift and iv subcommands
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Continuous target column to binarize
    #[arg(short, long)]
    pub target: String,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Feature to show in detail (defaults to the strongest)
    #[arg(long)]
    pub feature: Option<String>,

    /// Show only the first N features of the ranking
    #[arg(long)]
    pub top: Option<usize>,

    /// Write the full analysis to this JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Preprocessing and binning options
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Fill missing target values before dropping incomplete rows
    #[arg(long)]
    pub impute_target: bool,

    /// Strategy for target imputation: mean, median or most_frequent
    #[arg(long, default_value = "median", value_parser = parse_impute_strategy)]
    pub target_impute: ImputeStrategy,

    /// Keep missing feature values instead of imputing them
    #[arg(long)]
    pub no_impute_features: bool,

    /// Strategy for feature imputation: mean, median or most_frequent
    #[arg(long, default_value = "median", value_parser = parse_impute_strategy)]
    pub feature_impute: ImputeStrategy,

    /// Fill entirely missing feature columns with 0 instead of skipping them
    #[arg(long)]
    pub fill_empty_zero: bool,

    /// Number of quantile bins (defaults: 10 for lift, 4 for iv)
    #[arg(long, value_parser = validate_bins)]
    pub bins: Option<usize>,

    /// Target binarization: median, quantile or cutoff
    #[arg(long, default_value = "median")]
    pub target_method: String,

    /// Threshold for the cutoff method (value >= cutoff is good)
    #[arg(long, allow_hyphen_values = true)]
    pub cutoff: Option<f64>,

    /// Quantile for the quantile method, strictly between 0 and 1
    #[arg(long, value_parser = validate_quantile)]
    pub quantile: Option<f64>,

    /// Analyze only these features (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,
}

impl AnalysisArgs {
    /// Build the engine configuration, using `default_bins` when `--bins` is absent.
    pub fn to_config(&self, default_bins: usize) -> Result<AnalysisConfig, EdaError> {
        let binarization =
            TargetBinarization::from_parts(&self.target_method, self.cutoff, self.quantile)?;

        let config = AnalysisConfig {
            impute_target: self.impute_target,
            target_impute_strategy: self.target_impute,
            impute_features: !self.no_impute_features,
            feature_impute_strategy: self.feature_impute,
            empty_column_policy: if self.fill_empty_zero {
                EmptyColumnPolicy::FillZero
            } else {
                EmptyColumnPolicy::Skip
            },
            bin_count: self.bins.unwrap_or(default_bins),
            binarization,
            features: if self.features.is_empty() {
                None
            } else {
                Some(self.features.clone())
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Arguments for the summary subcommand
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Lower percentile for outlier detection (0-100)
    #[arg(long, default_value = "5", value_parser = validate_percent)]
    pub lower_pct: f64,

    /// Upper percentile for outlier detection (0-100)
    #[arg(long, default_value = "95", value_parser = validate_percent)]
    pub upper_pct: f64,

    /// Hide columns with fewer distinct values than this
    #[arg(long, default_value = "2")]
    pub min_unique: usize,

    /// Include non-numeric columns
    #[arg(long)]
    pub all_types: bool,

    /// Hide columns with a higher missing percentage than this (0-100)
    #[arg(long, default_value = "80", value_parser = validate_percent)]
    pub max_missing_pct: f64,

    /// Hide numeric columns with a lower variance than this
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub min_variance: f64,
}

impl SummaryArgs {
    pub fn to_filter(&self) -> SummaryFilter {
        SummaryFilter {
            min_unique: self.min_unique,
            numeric_only: !self.all_types,
            max_missing_pct: self.max_missing_pct,
            min_variance: self.min_variance,
        }
    }
}

/// Arguments for the correlations subcommand
#[derive(Args, Debug, Clone)]
pub struct CorrelationArgs {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target column
    #[arg(short, long)]
    pub target: String,

    /// Show only the first N features
    #[arg(long)]
    pub top: Option<usize>,
}

/// Arguments for the explore subcommand
#[derive(Args, Debug, Clone)]
pub struct ExploreArgs {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,
}

impl Commands {
    /// Default bin count of the engine a subcommand runs, if it runs one
    pub fn default_bins(&self) -> Option<usize> {
        match self {
            Commands::Lift(_) => Some(DEFAULT_LIFT_BINS),
            Commands::Iv(_) => Some(DEFAULT_IV_BINS),
            _ => None,
        }
    }
}

fn parse_impute_strategy(s: &str) -> Result<ImputeStrategy, String> {
    s.parse::<ImputeStrategy>().map_err(|e| e.to_string())
}

/// Validator for the bin count
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value < 2 {
        Err(format!("bins must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the target quantile
fn validate_quantile(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "quantile must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    }
}

/// Validator for percentages
fn validate_percent(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=100.0).contains(&value) {
        Err(format!("must be between 0 and 100, got {}", value))
    } else {
        Ok(value)
    }
}

fn validate_threads(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("threads must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid number", s)),
    }
}
