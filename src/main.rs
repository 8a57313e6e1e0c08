//! simply-eda: exploratory analysis CLI
//!
//! Lift and Information Value reports over quantile bins, univariate
//! summaries and target correlations for CSV and Parquet datasets.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use simply_eda::cli::{self, Cli, Commands, CorrelationArgs, EngineArgs, SummaryArgs};
use simply_eda::pipeline::{
    build_iv, build_lift, describe_columns, load_dataset_with_progress, target_correlations,
    SummaryKpis,
};
use simply_eda::report::{
    correlation_table, display_iv, display_lift, export_iv, export_lift, kpi_table, summary_table,
    ExportParams,
};
use simply_eda::utils::{
    create_spinner, finish_feature_tally, print_banner, print_completion, print_config, print_count,
    print_info, print_saved, print_step_header, print_step_time, print_success,
};

#[derive(Clone, Copy)]
enum EngineKind {
    Lift,
    Iv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "warn",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let default_bins = cli.command.default_bins();
    match &cli.command {
        Commands::Lift(args) => {
            run_engine(EngineKind::Lift, args, default_bins, cli.infer_schema_length)
        }
        Commands::Iv(args) => {
            run_engine(EngineKind::Iv, args, default_bins, cli.infer_schema_length)
        }
        Commands::Summary(args) => run_summary(args, cli.infer_schema_length),
        Commands::Correlations(args) => run_correlations(args, cli.infer_schema_length),
        Commands::Explore(args) => {
            print_banner(env!("CARGO_PKG_VERSION"));
            let (df, _, _, _) = load_dataset_with_progress(&args.input, cli.infer_schema_length)?;
            cli::run_explore(&df, &args.input)
        }
    }
}

fn load_step(input: &Path, infer_schema_length: usize) -> Result<polars::prelude::DataFrame> {
    print_step_header(1, "Load dataset");
    let step_start = Instant::now();
    let (df, rows, cols, memory_mb) = load_dataset_with_progress(input, infer_schema_length)?;
    print_success("Dataset loaded");
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());
    Ok(df)
}

fn run_engine(
    kind: EngineKind,
    args: &EngineArgs,
    default_bins: Option<usize>,
    infer_schema_length: usize,
) -> Result<()> {
    let config = args
        .analysis
        .to_config(default_bins.unwrap_or(simply_eda::pipeline::DEFAULT_LIFT_BINS))
        .context("Invalid analysis settings")?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &args.input,
        Some(args.target.as_str()),
        &cli::settings_summary(&config),
    );

    let df = load_step(&args.input, infer_schema_length)?;

    let title = match kind {
        EngineKind::Lift => "Lift analysis",
        EngineKind::Iv => "Information value analysis",
    };
    print_step_header(2, title);
    let step_start = Instant::now();
    let spinner = create_spinner("Binning features...");

    let input_file = args.input.display().to_string();
    let params = ExportParams {
        input_file: &input_file,
        target_column: &args.target,
        config: &config,
    };

    match kind {
        EngineKind::Lift => {
            let results = build_lift(&df, &args.target, &config)
                .with_context(|| format!("Lift analysis failed for target '{}'", args.target))?;
            finish_spinner(&spinner, results.reports.len(), results.skipped.len());
            print_step_time(step_start.elapsed());

            if let Some(feature) = &args.feature {
                ensure_reported(feature, results.get(feature).is_some(), &results.skipped)?;
            }
            display_lift(&results, args.feature.as_deref(), args.top);

            if let Some(path) = &args.export {
                export_lift(&results, path, &params)?;
                print_saved(path);
            }
            results.require_any()?;
        }
        EngineKind::Iv => {
            let results = build_iv(&df, &args.target, &config)
                .with_context(|| format!("IV analysis failed for target '{}'", args.target))?;
            finish_spinner(&spinner, results.reports.len(), results.skipped.len());
            print_step_time(step_start.elapsed());

            if let Some(feature) = &args.feature {
                ensure_reported(feature, results.get(feature).is_some(), &results.skipped)?;
            }
            display_iv(&results, args.feature.as_deref(), args.top);

            if let Some(path) = &args.export {
                export_iv(&results, path, &params)?;
                print_saved(path);
            }
            results.require_any()?;
        }
    }

    print_completion();
    Ok(())
}

fn finish_spinner(spinner: &indicatif::ProgressBar, analyzed: usize, skipped: usize) {
    finish_feature_tally(spinner, analyzed, skipped);
    info!(analyzed, skipped, "engine run finished");
}

/// Fail with a useful message when the requested feature has no report
fn ensure_reported(
    feature: &str,
    reported: bool,
    skipped: &[simply_eda::pipeline::SkippedFeature],
) -> Result<()> {
    if reported {
        return Ok(());
    }
    match skipped.iter().find(|s| s.feature == feature) {
        Some(s) => anyhow::bail!("Feature '{}' was skipped: {}", feature, s.reason),
        None => anyhow::bail!("Feature '{}' is not among the analyzed features", feature),
    }
}

fn run_summary(args: &SummaryArgs, infer_schema_length: usize) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));
    let df = load_step(&args.input, infer_schema_length)?;

    print_step_header(2, "Univariate summary");
    let summaries = describe_columns(&df, args.lower_pct, args.upper_pct)
        .context("Failed to summarize columns")?;

    let kpis = SummaryKpis::from_summaries(&summaries);
    println!("{}", kpi_table(&kpis));

    let filtered = args.to_filter().apply(&summaries);
    print_count(
        "column(s) after filtering",
        filtered.len(),
        Some(format!("of {}", summaries.len()).as_str()),
    );
    println!("{}", summary_table(&filtered));

    print_completion();
    Ok(())
}

fn run_correlations(args: &CorrelationArgs, infer_schema_length: usize) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));
    let df = load_step(&args.input, infer_schema_length)?;

    print_step_header(2, "Target correlations");
    let correlations = target_correlations(&df, &args.target)
        .with_context(|| format!("Failed to correlate with target '{}'", args.target))?;

    if correlations.is_empty() {
        print_info("No numeric feature columns to correlate");
    } else {
        println!("{}", correlation_table(&correlations, args.top));
    }

    print_completion();
    Ok(())
}
