//! CLI module - argument parsing, interactive prompts and the explore session

pub mod args;
pub mod explore;
pub mod prompts;

pub use args::{AnalysisArgs, Cli, Commands, CorrelationArgs, EngineArgs, ExploreArgs, SummaryArgs};
pub use explore::{run_explore, settings_summary, ExploreSession};
pub use prompts::*;
