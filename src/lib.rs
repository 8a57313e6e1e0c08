//! simply-eda: exploratory analysis of tabular data
//!
//! A library for profiling datasets and measuring the predictive power of
//! numeric features against a continuous target, using quantile binning,
//! lift tables and Weight of Evidence / Information Value.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
