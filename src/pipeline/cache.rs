//! Memoization of engine runs for interactive sessions
//!
//! The cache keeps one entry per engine. An entry is reused only while the
//! dataset shape, target and full configuration are unchanged; any
//! difference recomputes and replaces it.

use std::sync::Arc;

use polars::prelude::*;
use tracing::debug;

use super::engine::{AnalysisConfig, FeatureReports};
use super::error::EdaError;
use super::iv::{build_iv, IvReport};
use super::lift::{build_lift, LiftReport};

/// Which report builder produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Lift,
    Iv,
}

/// Everything a cached result depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    engine: Engine,
    target: String,
    columns: Vec<String>,
    height: usize,
    config: String,
}

impl CacheKey {
    pub fn new(
        engine: Engine,
        df: &DataFrame,
        target: &str,
        config: &AnalysisConfig,
    ) -> Result<Self, EdaError> {
        let config = serde_json::to_string(config)
            .map_err(|e| EdaError::invalid("config", e.to_string()))?;
        Ok(Self {
            engine,
            target: target.to_string(),
            columns: df
                .get_column_names()
                .into_iter()
                .map(|n| n.to_string())
                .collect(),
            height: df.height(),
            config,
        })
    }
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Per-session cache of the latest Lift and IV results
#[derive(Debug, Default)]
pub struct AnalysisCache {
    lift: Option<(CacheKey, Arc<FeatureReports<LiftReport>>)>,
    iv: Option<(CacheKey, Arc<FeatureReports<IvReport>>)>,
    stats: CacheStats,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lift reports for the given inputs, computed on a key miss.
    pub fn lift(
        &mut self,
        df: &DataFrame,
        target: &str,
        config: &AnalysisConfig,
    ) -> Result<Arc<FeatureReports<LiftReport>>, EdaError> {
        let key = CacheKey::new(Engine::Lift, df, target, config)?;
        lookup(&mut self.lift, &mut self.stats, key, || {
            build_lift(df, target, config)
        })
    }

    /// IV reports for the given inputs, computed on a key miss.
    pub fn iv(
        &mut self,
        df: &DataFrame,
        target: &str,
        config: &AnalysisConfig,
    ) -> Result<Arc<FeatureReports<IvReport>>, EdaError> {
        let key = CacheKey::new(Engine::Iv, df, target, config)?;
        lookup(&mut self.iv, &mut self.stats, key, || build_iv(df, target, config))
    }

    /// Drop every cached entry. Counters are kept.
    pub fn invalidate(&mut self) {
        self.lift = None;
        self.iv = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

fn lookup<R>(
    slot: &mut Option<(CacheKey, Arc<FeatureReports<R>>)>,
    stats: &mut CacheStats,
    key: CacheKey,
    compute: impl FnOnce() -> Result<FeatureReports<R>, EdaError>,
) -> Result<Arc<FeatureReports<R>>, EdaError> {
    if let Some((cached_key, value)) = slot.as_ref() {
        if *cached_key == key {
            stats.hits += 1;
            debug!(engine = ?key.engine, target = %key.target, "cache hit");
            return Ok(Arc::clone(value));
        }
    }

    stats.misses += 1;
    debug!(engine = ?key.engine, target = %key.target, "cache miss");
    let value = Arc::new(compute()?);
    *slot = Some((key, Arc::clone(&value)));
    Ok(value)
}
