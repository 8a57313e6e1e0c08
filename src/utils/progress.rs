//! Spinners for dataset loading and per-feature engine runs

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Start a steady-ticking spinner on stderr.
///
/// indicatif hides the spinner when stderr is not a terminal, so piped runs
/// only see the final report.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is valid")
            .tick_chars(TICK_CHARS),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(TICK_INTERVAL);
    pb
}

pub fn tally_message(analyzed: usize, skipped: usize) -> String {
    format!("{} feature(s) analyzed, {} skipped", analyzed, skipped)
}

/// Close an engine spinner with its analyzed/skipped tally; a run that
/// analyzed nothing ends on a warning mark.
pub fn finish_feature_tally(pb: &ProgressBar, analyzed: usize, skipped: usize) {
    let message = tally_message(analyzed, skipped);
    if analyzed == 0 {
        pb.finish_with_message(format!("⚠️  {}", message));
    } else {
        pb.finish_with_message(format!("✅ {}", message));
    }
}
