//! Candidate specifications — parameterized strategy factories.
//!
//! A candidate couples a parameter set with a factory that builds a FRESH
//! strategy instance per call. Strategies carry per-instance state
//! (confirmation streaks), so an instance must never be shared across two
//! evaluation slices; every train run and every test run gets its own.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use edgelab_core::strategies::{ChannelBreakout, MeanReversion, Momentum};
use edgelab_core::strategy::Strategy;

use crate::config::CandidateGridConfig;

/// Factory producing a fresh strategy instance per call.
pub type StrategyFactory = Arc<dyn Fn() -> Box<dyn Strategy> + Send + Sync>;

/// A parameterized, buildable strategy candidate.
#[derive(Clone)]
pub struct CandidateSpec {
    pub id: String,
    pub family: String,
    pub params: BTreeMap<String, f64>,
    builder: StrategyFactory,
}

impl fmt::Debug for CandidateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateSpec")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl CandidateSpec {
    pub fn new(
        id: impl Into<String>,
        family: impl Into<String>,
        params: BTreeMap<String, f64>,
        builder: StrategyFactory,
    ) -> Self {
        Self {
            id: id.into(),
            family: family.into(),
            params,
            builder,
        }
    }

    /// Build a fresh strategy instance. Never reuse the returned instance
    /// across slices.
    pub fn build_strategy(&self) -> Box<dyn Strategy> {
        (self.builder)()
    }

    /// Stable content hash of family + parameters. Two candidates with the
    /// same family and params share a hash regardless of their ids.
    pub fn config_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.family.as_bytes());
        for (key, value) in &self.params {
            hasher.update(key.as_bytes());
            hasher.update(&value.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Serializable identity projection (everything but the factory).
    pub fn descriptor(&self) -> CandidateDescriptor {
        CandidateDescriptor {
            id: self.id.clone(),
            family: self.family.clone(),
            params: self.params.clone(),
            config_hash: self.config_hash(),
        }
    }
}

/// Serializable candidate identity carried through evaluations and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDescriptor {
    pub id: String,
    pub family: String,
    pub params: BTreeMap<String, f64>,
    pub config_hash: String,
}

/// Expand the configured per-family grids into a flat candidate list.
///
/// Degenerate combinations (an exit band at or beyond its entry band) are
/// skipped rather than rejected.
pub fn build_grid(config: &CandidateGridConfig) -> Vec<CandidateSpec> {
    let mut candidates = Vec::new();

    if let Some(grid) = &config.momentum {
        for &lookback in &grid.lookbacks {
            for &threshold in &grid.thresholds {
                for &confirm in &grid.confirm_bars {
                    let params = BTreeMap::from([
                        ("lookback".to_string(), lookback as f64),
                        ("threshold".to_string(), threshold),
                        ("confirm_bars".to_string(), confirm as f64),
                    ]);
                    candidates.push(CandidateSpec::new(
                        format!("momentum-lb{lookback}-th{threshold}-cf{confirm}"),
                        "momentum",
                        params,
                        Arc::new(move || {
                            Box::new(Momentum::new(lookback, threshold, confirm)) as Box<dyn Strategy>
                        }),
                    ));
                }
            }
        }
    }

    if let Some(grid) = &config.mean_reversion {
        for &lookback in &grid.lookbacks {
            for &entry_z in &grid.entry_z {
                for &exit_z in &grid.exit_z {
                    if exit_z >= entry_z {
                        continue;
                    }
                    let params = BTreeMap::from([
                        ("lookback".to_string(), lookback as f64),
                        ("entry_z".to_string(), entry_z),
                        ("exit_z".to_string(), exit_z),
                    ]);
                    candidates.push(CandidateSpec::new(
                        format!("mean_reversion-lb{lookback}-ez{entry_z}-xz{exit_z}"),
                        "mean_reversion",
                        params,
                        Arc::new(move || {
                            Box::new(MeanReversion::new(lookback, entry_z, exit_z))
                                as Box<dyn Strategy>
                        }),
                    ));
                }
            }
        }
    }

    if let Some(grid) = &config.breakout {
        for &lookback in &grid.lookbacks {
            let params = BTreeMap::from([("lookback".to_string(), lookback as f64)]);
            candidates.push(CandidateSpec::new(
                format!("breakout-lb{lookback}"),
                "breakout",
                params,
                Arc::new(move || Box::new(ChannelBreakout::new(lookback)) as Box<dyn Strategy>),
            ));
        }
    }

    candidates
}
