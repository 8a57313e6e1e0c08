//! Interactive exploration session
//!
//! The session keeps one configuration per engine and an [`AnalysisCache`],
//! so switching between features or re-opening a report only recomputes
//! when the target or a setting changed.

use std::path::Path;

use anyhow::Result;
use console::style;
use polars::prelude::*;
use tracing::debug;

use super::prompts::{confirm_step, input_value, select_item};
use crate::pipeline::{
    numeric_column_names, AnalysisCache, AnalysisConfig, EmptyColumnPolicy, ImputeStrategy,
    IvReport, LiftReport, TargetBinarization, DEFAULT_IV_BINS, DEFAULT_LIFT_BINS,
};
use crate::report::{
    display_iv, display_lift, display_skipped, iv_bins_table, iv_metrics_table, lift_bins_table,
    lift_metrics_table,
};
use crate::utils::{print_config, print_info, print_warning};

const ACTIONS: [&str; 6] = [
    "Lift analysis",
    "Information value (WoE)",
    "Change target",
    "Change settings",
    "Cache statistics",
    "Quit",
];

const STRATEGIES: [ImputeStrategy; 3] = [
    ImputeStrategy::Mean,
    ImputeStrategy::Median,
    ImputeStrategy::MostFrequent,
];

/// Mutable state of an exploration session
pub struct ExploreSession {
    pub target: String,
    pub lift_config: AnalysisConfig,
    pub iv_config: AnalysisConfig,
    pub cache: AnalysisCache,
}

impl ExploreSession {
    pub fn new(target: String) -> Self {
        Self {
            target,
            lift_config: AnalysisConfig::default().with_bin_count(DEFAULT_LIFT_BINS),
            iv_config: AnalysisConfig::default().with_bin_count(DEFAULT_IV_BINS),
            cache: AnalysisCache::new(),
        }
    }
}

/// Human-readable lines describing a configuration
pub fn settings_summary(config: &AnalysisConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Bins", config.bin_count.to_string()),
        ("Binarization", config.binarization.to_string()),
        (
            "Target imputation",
            if config.impute_target {
                config.target_impute_strategy.to_string()
            } else {
                "off".to_string()
            },
        ),
        (
            "Feature imputation",
            if config.impute_features {
                config.feature_impute_strategy.to_string()
            } else {
                "off".to_string()
            },
        ),
        (
            "Empty columns",
            match config.empty_column_policy {
                EmptyColumnPolicy::Skip => "skip".to_string(),
                EmptyColumnPolicy::FillZero => "fill with 0".to_string(),
            },
        ),
    ]
}

/// Run the interactive loop until the user quits.
pub fn run_explore(df: &DataFrame, input: &Path) -> Result<()> {
    let numeric = numeric_column_names(df);
    if numeric.len() < 2 {
        anyhow::bail!("Exploration needs a numeric target and at least one numeric feature");
    }

    let target = numeric[select_item("Target column", &numeric, 0)?].clone();
    let mut session = ExploreSession::new(target);

    loop {
        println!();
        let action = select_item("What next?", &ACTIONS, 0)?;
        match action {
            0 => {
                let settings = settings_summary(&session.lift_config);
                print_config(input, Some(session.target.as_str()), &settings);
                let results = session.cache.lift(df, &session.target, &session.lift_config)?;
                if results.is_empty() {
                    print_warning("No feature produced a lift report");
                    display_skipped(&results.skipped);
                    continue;
                }
                let ranked: Vec<String> = LiftReport::ranking(&results.reports)
                    .iter()
                    .map(|r| r.feature.clone())
                    .collect();
                match pick_feature(&ranked)? {
                    Some(name) => {
                        if let Some(report) = results.get(&name) {
                            println!("{}", lift_bins_table(report));
                            println!("{}", lift_metrics_table(report));
                        }
                    }
                    None => display_lift(&results, None, None),
                }
            }
            1 => {
                let settings = settings_summary(&session.iv_config);
                print_config(input, Some(session.target.as_str()), &settings);
                let results = session.cache.iv(df, &session.target, &session.iv_config)?;
                if results.is_empty() {
                    print_warning("No feature produced an IV report");
                    display_skipped(&results.skipped);
                    continue;
                }
                let ranked: Vec<String> = IvReport::ranking(&results.reports)
                    .iter()
                    .map(|r| r.feature.clone())
                    .collect();
                match pick_feature(&ranked)? {
                    Some(name) => {
                        if let Some(report) = results.get(&name) {
                            println!("{}", iv_bins_table(report));
                            println!("{}", iv_metrics_table(report));
                        }
                    }
                    None => display_iv(&results, None, None),
                }
            }
            2 => {
                let current = numeric
                    .iter()
                    .position(|n| *n == session.target)
                    .unwrap_or(0);
                session.target = numeric[select_item("Target column", &numeric, current)?].clone();
                debug!(target = %session.target, "target changed");
            }
            3 => {
                let which = select_item("Settings for", &["Lift", "Information value"], 0)?;
                let config = if which == 0 {
                    &mut session.lift_config
                } else {
                    &mut session.iv_config
                };
                edit_settings(config)?;
            }
            4 => {
                let stats = session.cache.stats();
                print_info(&format!(
                    "Cache: {} hit(s), {} miss(es)",
                    style(stats.hits).green(),
                    style(stats.misses).yellow()
                ));
            }
            _ => break,
        }
    }

    Ok(())
}

/// Ask for a feature from a ranked list; `None` means "show the full report"
fn pick_feature(ranked: &[String]) -> Result<Option<String>> {
    let mut items: Vec<String> = vec!["Full report (strongest feature + ranking)".to_string()];
    items.extend(ranked.iter().cloned());
    let index = select_item("Feature", &items, 0)?;
    Ok(if index == 0 {
        None
    } else {
        Some(ranked[index - 1].clone())
    })
}

/// Prompt defaults `(quantile, cutoff)` carried over from the current method
fn binarization_defaults(method: &TargetBinarization) -> (f64, f64) {
    match *method {
        TargetBinarization::Quantile { q } => (q, 0.0),
        TargetBinarization::Cutoff { value } => (0.5, value),
        TargetBinarization::Median => (0.5, 0.0),
    }
}

fn edit_settings(config: &mut AnalysisConfig) -> Result<()> {
    config.bin_count = input_value("Number of bins", config.bin_count, |k: &usize| {
        if *k >= 2 {
            Ok(())
        } else {
            Err("at least 2 bins are required".to_string())
        }
    })?;

    let methods = ["median", "quantile", "cutoff"];
    let current = match config.binarization {
        TargetBinarization::Median => 0,
        TargetBinarization::Quantile { .. } => 1,
        TargetBinarization::Cutoff { .. } => 2,
    };
    let (default_q, default_cutoff) = binarization_defaults(&config.binarization);
    config.binarization = match select_item("Target binarization", &methods, current)? {
        1 => TargetBinarization::Quantile {
            q: input_value("Quantile (0-1, exclusive)", default_q, |q: &f64| {
                if *q > 0.0 && *q < 1.0 {
                    Ok(())
                } else {
                    Err("must be strictly between 0 and 1".to_string())
                }
            })?,
        },
        2 => TargetBinarization::Cutoff {
            value: input_value("Cutoff (value >= cutoff is good)", default_cutoff, |v: &f64| {
                if v.is_finite() {
                    Ok(())
                } else {
                    Err("must be a finite number".to_string())
                }
            })?,
        },
        _ => TargetBinarization::Median,
    };

    config.impute_target = confirm_step("Impute missing target values?", config.impute_target)?;
    if config.impute_target {
        config.target_impute_strategy =
            pick_strategy("Target strategy", config.target_impute_strategy)?;
    }

    config.impute_features =
        confirm_step("Impute missing feature values?", config.impute_features)?;
    if config.impute_features {
        config.feature_impute_strategy =
            pick_strategy("Feature strategy", config.feature_impute_strategy)?;
        config.empty_column_policy = if confirm_step(
            "Fill entirely missing columns with 0?",
            config.empty_column_policy == EmptyColumnPolicy::FillZero,
        )? {
            EmptyColumnPolicy::FillZero
        } else {
            EmptyColumnPolicy::Skip
        };
    }

    Ok(())
}

fn pick_strategy(prompt: &str, current: ImputeStrategy) -> Result<ImputeStrategy> {
    let default = STRATEGIES.iter().position(|s| *s == current).unwrap_or(1);
    Ok(STRATEGIES[select_item(prompt, &STRATEGIES, default)?])
}
