//! Terminal tables for lift, IV, correlation and summary reports

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::describe::HIGH_MISSING_PCT;
use crate::pipeline::{
    ColumnSummary, FeatureReports, IvReport, IvStrength, LiftReport, LiftStrength,
    SkippedFeature, SummaryKpis, TargetCorrelation,
};

/// Width of the inline bar drawn next to each bin
pub const BAR_WIDTH: usize = 20;

/// Render `value` as a bar of up to `width` cells, scaled against `max`.
///
/// Negative values and a non-positive `max` yield an empty bar.
pub fn inline_bar(value: f64, max: f64, width: usize) -> String {
    if !(max > 0.0) || !(value > 0.0) {
        return String::new();
    }
    let filled = ((value / max).min(1.0) * width as f64).round() as usize;
    "█".repeat(filled)
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table(columns: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(columns));
    table
}

fn num(value: f64, decimals: usize) -> Cell {
    Cell::new(format!("{:.*}", decimals, value)).set_alignment(CellAlignment::Right)
}

fn opt_num(value: Option<f64>, decimals: usize) -> Cell {
    match value {
        Some(v) => num(v, decimals),
        None => Cell::new("-").set_alignment(CellAlignment::Right),
    }
}

fn lift_color(lift: f64) -> Color {
    if lift > crate::pipeline::lift::STRONG_LIFT {
        Color::Green
    } else if lift < crate::pipeline::lift::WEAK_LIFT {
        Color::Red
    } else {
        Color::White
    }
}

fn lift_strength_color(strength: LiftStrength) -> Color {
    match strength {
        LiftStrength::High => Color::Green,
        LiftStrength::Medium => Color::Yellow,
        LiftStrength::Low => Color::DarkGrey,
    }
}

fn iv_strength_color(strength: IvStrength) -> Color {
    match strength {
        IvStrength::NotUseful => Color::DarkGrey,
        IvStrength::Weak => Color::White,
        IvStrength::Medium => Color::Yellow,
        IvStrength::Strong => Color::Green,
        IvStrength::Suspicious => Color::Red,
    }
}

/// Per-bin lift table with a bar proportional to lift
pub fn lift_bins_table(report: &LiftReport) -> Table {
    let mut table = new_table(&["Bin", "Count", "Good", "Good rate", "Lift", ""]);
    for bin in &report.bins {
        table.add_row(vec![
            Cell::new(&bin.bin_label),
            Cell::new(bin.count).set_alignment(CellAlignment::Right),
            Cell::new(bin.good).set_alignment(CellAlignment::Right),
            num(bin.good_rate, 4),
            num(bin.lift, 3).fg(lift_color(bin.lift)),
            Cell::new(inline_bar(bin.lift, report.max_lift, BAR_WIDTH)).fg(Color::Cyan),
        ]);
    }
    table
}

/// Headline metrics of one lift report
pub fn lift_metrics_table(report: &LiftReport) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Baseline good rate"), num(report.baseline, 4)]);
    table.add_row(vec![Cell::new("Max lift"), num(report.max_lift, 3)]);
    table.add_row(vec![Cell::new("Min lift"), num(report.min_lift, 3)]);
    table.add_row(vec![Cell::new("Average lift"), num(report.mean_lift, 3)]);
    table.add_row(vec![Cell::new("Lift std"), num(report.lift_std, 3)]);
    table.add_row(vec![
        Cell::new("Strong bins (> 1.2)"),
        Cell::new(report.strong_bins).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Weak bins (< 0.8)"),
        Cell::new(report.weak_bins).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Strength"),
        Cell::new(report.strength)
            .fg(lift_strength_color(report.strength))
            .add_attribute(Attribute::Bold),
    ]);
    table
}

/// Features ranked by lift spread
pub fn lift_ranking_table(reports: &[LiftReport], top: Option<usize>) -> Table {
    let mut table = new_table(&[
        "#", "Feature", "Lift std", "Max lift", "Min lift", "Bins", "Strength",
    ]);
    let ranked = LiftReport::ranking(reports);
    for (i, report) in ranked.iter().take(top.unwrap_or(usize::MAX)).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&report.feature),
            num(report.lift_std, 3),
            num(report.max_lift, 3),
            num(report.min_lift, 3),
            Cell::new(report.bins.len()).set_alignment(CellAlignment::Right),
            Cell::new(report.strength).fg(lift_strength_color(report.strength)),
        ]);
    }
    table
}

/// Per-bin WoE table with a bar proportional to |WoE|
pub fn iv_bins_table(report: &IvReport) -> Table {
    let mut table = new_table(&[
        "Bin", "Count", "Good", "Bad", "Dist good", "Dist bad", "WoE", "IV", "",
    ]);
    let max_abs = report
        .bins
        .iter()
        .map(|b| b.woe.abs())
        .fold(0.0, f64::max);
    for bin in &report.bins {
        let color = if bin.woe >= 0.0 { Color::Green } else { Color::Red };
        table.add_row(vec![
            Cell::new(&bin.bin_label),
            Cell::new(bin.count).set_alignment(CellAlignment::Right),
            Cell::new(bin.good).set_alignment(CellAlignment::Right),
            Cell::new(bin.bad).set_alignment(CellAlignment::Right),
            num(bin.dist_good, 4),
            num(bin.dist_bad, 4),
            num(bin.woe, 4).fg(color),
            num(bin.iv_bin, 4),
            Cell::new(inline_bar(bin.woe.abs(), max_abs, BAR_WIDTH)).fg(color),
        ]);
    }
    table
}

/// Headline metrics of one IV report
pub fn iv_metrics_table(report: &IvReport) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Information value"), num(report.iv, 4)]);
    table.add_row(vec![Cell::new("Max WoE"), num(report.max_woe, 4)]);
    table.add_row(vec![Cell::new("Min WoE"), num(report.min_woe, 4)]);
    table.add_row(vec![Cell::new("Average WoE"), num(report.mean_woe, 4)]);
    table.add_row(vec![
        Cell::new("Strength"),
        Cell::new(report.strength)
            .fg(iv_strength_color(report.strength))
            .add_attribute(Attribute::Bold),
    ]);
    table
}

/// Features ranked by IV
pub fn iv_ranking_table(reports: &[IvReport], top: Option<usize>) -> Table {
    let mut table = new_table(&["#", "Feature", "IV", "Bins", "Strength"]);
    let ranked = IvReport::ranking(reports);
    for (i, report) in ranked.iter().take(top.unwrap_or(usize::MAX)).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&report.feature),
            num(report.iv, 4),
            Cell::new(report.bins.len()).set_alignment(CellAlignment::Right),
            Cell::new(report.strength).fg(iv_strength_color(report.strength)),
        ]);
    }
    table
}

/// Skipped features and why
pub fn skipped_table(skipped: &[SkippedFeature]) -> Table {
    let mut table = new_table(&["Feature", "Reason"]);
    for s in skipped {
        table.add_row(vec![
            Cell::new(&s.feature),
            Cell::new(s.reason.to_string()).fg(Color::Yellow),
        ]);
    }
    table
}

/// Target correlations, strongest first
pub fn correlation_table(correlations: &[TargetCorrelation], top: Option<usize>) -> Table {
    let mut table = new_table(&["#", "Feature", "Pearson r", "Rows", ""]);
    for (i, c) in correlations
        .iter()
        .take(top.unwrap_or(usize::MAX))
        .enumerate()
    {
        let color = match c.correlation {
            Some(r) if r >= 0.0 => Color::Green,
            Some(_) => Color::Red,
            None => Color::DarkGrey,
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&c.feature),
            opt_num(c.correlation, 4).fg(color),
            Cell::new(c.n).set_alignment(CellAlignment::Right),
            Cell::new(inline_bar(c.correlation.map_or(0.0, f64::abs), 1.0, BAR_WIDTH)).fg(color),
        ]);
    }
    table
}

/// Univariate summary, one row per column
pub fn summary_table(summaries: &[ColumnSummary]) -> Table {
    let mut table = new_table(&[
        "Column", "Type", "Unique", "Missing %", "Mean", "Median", "Std", "Min", "Max", "Top",
        "Outliers %",
    ]);
    for s in summaries {
        let missing = num(s.pct_missing, 1).fg(if s.pct_missing >= HIGH_MISSING_PCT {
            Color::Red
        } else {
            Color::White
        });
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(&s.dtype),
            Cell::new(s.n_unique).set_alignment(CellAlignment::Right),
            missing,
            opt_num(s.mean, 4),
            opt_num(s.median, 4),
            opt_num(s.std, 4),
            opt_num(s.min, 4),
            opt_num(s.max, 4),
            Cell::new(match &s.top_value {
                Some(v) => format!("{} ({})", v, s.top_freq),
                None => "-".to_string(),
            }),
            opt_num(s.pct_outliers, 2),
        ]);
    }
    table
}

/// Headline counts of a summary
pub fn kpi_table(kpis: &SummaryKpis) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Numeric columns"), Cell::new(kpis.numeric_columns)]);
    table.add_row(vec![
        Cell::new("Non-numeric columns"),
        Cell::new(kpis.non_numeric_columns),
    ]);
    table.add_row(vec![
        Cell::new("Columns ≥ 50% missing"),
        Cell::new(kpis.high_missing_columns).fg(if kpis.high_missing_columns > 0 {
            Color::Red
        } else {
            Color::White
        }),
    ]);
    table.add_row(vec![
        Cell::new("Constant columns"),
        Cell::new(kpis.constant_columns),
    ]);
    table
}

fn print_section(title: &str) {
    println!();
    println!("    {} {}", style("▸").cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

/// Pick the report to detail: the named feature, or the first of `ranked`.
fn select<'a, R: crate::pipeline::FeatureReport>(
    results: &'a FeatureReports<R>,
    ranked: Vec<&'a R>,
    feature: Option<&str>,
) -> Option<&'a R> {
    match feature {
        Some(name) => results.get(name),
        None => ranked.into_iter().next(),
    }
}

/// Print a full lift report: selected feature detail, ranking and skips.
pub fn display_lift(
    results: &FeatureReports<LiftReport>,
    feature: Option<&str>,
    top: Option<usize>,
) {
    if let Some(report) = select(results, LiftReport::ranking(&results.reports), feature) {
        print_section(&format!("Lift by decile: {}", report.feature));
        println!("{}", lift_bins_table(report));
        println!("{}", lift_metrics_table(report));
    }
    if !results.reports.is_empty() {
        print_section("Feature ranking (lift std)");
        println!("{}", lift_ranking_table(&results.reports, top));
    }
    display_skipped(&results.skipped);
}

/// Print a full IV report: selected feature detail, ranking and skips.
pub fn display_iv(results: &FeatureReports<IvReport>, feature: Option<&str>, top: Option<usize>) {
    if let Some(report) = select(results, IvReport::ranking(&results.reports), feature) {
        print_section(&format!("Weight of evidence: {}", report.feature));
        println!("{}", iv_bins_table(report));
        println!("{}", iv_metrics_table(report));
    }
    if !results.reports.is_empty() {
        print_section("Feature ranking (information value)");
        println!("{}", iv_ranking_table(&results.reports, top));
    }
    display_skipped(&results.skipped);
}

/// Print the skipped-feature list, if any
pub fn display_skipped(skipped: &[SkippedFeature]) {
    if skipped.is_empty() {
        return;
    }
    print_section(&format!("Skipped features ({})", skipped.len()));
    println!("{}", skipped_table(skipped));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{EdaError, IvTable, LiftBin};

    fn lift_report() -> LiftReport {
        LiftReport::from_bins(
            "income",
            0.5,
            vec![
                LiftBin {
                    bin_label: "[1, 10]".into(),
                    lower_bound: 1.0,
                    upper_bound: 10.0,
                    count: 10,
                    good: 2,
                    good_rate: 0.2,
                    lift: 0.4,
                },
                LiftBin {
                    bin_label: "[11, 20]".into(),
                    lower_bound: 11.0,
                    upper_bound: 20.0,
                    count: 10,
                    good: 8,
                    good_rate: 0.8,
                    lift: 1.6,
                },
            ],
        )
    }

    #[test]
    fn test_inline_bar_scaling() {
        assert_eq!(inline_bar(2.0, 2.0, 10).chars().count(), 10);
        assert_eq!(inline_bar(1.0, 2.0, 10).chars().count(), 5);
        assert_eq!(inline_bar(5.0, 2.0, 10).chars().count(), 10);
        assert_eq!(inline_bar(-1.0, 2.0, 10), "");
        assert_eq!(inline_bar(1.0, 0.0, 10), "");
        assert_eq!(inline_bar(f64::NAN, 1.0, 10), "");
    }

    #[test]
    fn test_lift_tables_render_bins_and_metrics() {
        let report = lift_report();
        let bins = lift_bins_table(&report).to_string();
        assert!(bins.contains("[11, 20]"));
        assert!(bins.contains("1.600"));

        let metrics = lift_metrics_table(&report).to_string();
        assert!(metrics.contains("High"));
        assert!(metrics.contains("0.5000"));
    }

    #[test]
    fn test_iv_ranking_table_orders_rows() {
        let reports = vec![
            IvReport::from_table("low", IvTable { bins: Vec::new(), iv: 0.01 }),
            IvReport::from_table("high", IvTable { bins: Vec::new(), iv: 0.4 }),
        ];
        let rendered = iv_ranking_table(&reports, None).to_string();
        let high = rendered.find("high").unwrap();
        let low = rendered.find("low").unwrap();
        assert!(high < low);
        assert!(rendered.contains("Not useful"));

        let top_one = iv_ranking_table(&reports, Some(1)).to_string();
        assert!(!top_one.contains("low"));
    }

    #[test]
    fn test_skipped_table_shows_reason() {
        let skipped = vec![SkippedFeature {
            feature: "tiny".into(),
            reason: EdaError::InsufficientData { reason: "3 rows".into() },
        }];
        let rendered = skipped_table(&skipped).to_string();
        assert!(rendered.contains("tiny"));
        assert!(rendered.contains("insufficient data: 3 rows"));
    }
}
