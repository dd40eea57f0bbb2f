//! Serializable sweep configuration, loaded from TOML.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgelab_core::engine::{CostConfig, RiskConfig};

use crate::folds::FoldConfig;

/// Configuration for a full evaluate-and-rank sweep.
///
/// All sections are optional in the TOML source; omitted sections fall
/// back to defaults (including the standard candidate grid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub folds: FoldConfig,
    pub risk: Option<RiskConfig>,
    pub costs: Option<CostConfig>,
    pub candidates: CandidateGridConfig,
    /// Portfolio size taken from the top of the ranked list.
    pub top_k: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            folds: FoldConfig::default(),
            risk: None,
            costs: None,
            candidates: CandidateGridConfig::standard(),
            top_k: 5,
        }
    }
}

impl SweepConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folds.min_train_bars < 2 {
            return Err(ConfigError::Invalid(
                "folds.min_train_bars must be at least 2".into(),
            ));
        }
        if self.folds.test_bars < 2 {
            return Err(ConfigError::Invalid(
                "folds.test_bars must be at least 2".into(),
            ));
        }
        if self.folds.step_bars == 0 {
            return Err(ConfigError::Invalid(
                "folds.step_bars must be positive".into(),
            ));
        }
        if self.folds.max_folds == 0 {
            return Err(ConfigError::Invalid(
                "folds.max_folds must be positive".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be positive".into()));
        }
        self.candidates.validate()
    }
}

/// Per-family parameter grids. A `None` family contributes no candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateGridConfig {
    pub momentum: Option<MomentumGrid>,
    pub mean_reversion: Option<MeanReversionGrid>,
    pub breakout: Option<BreakoutGrid>,
}

impl CandidateGridConfig {
    /// The stock three-family grid used when no grids are configured.
    pub fn standard() -> Self {
        Self {
            momentum: Some(MomentumGrid::default()),
            mean_reversion: Some(MeanReversionGrid::default()),
            breakout: Some(BreakoutGrid::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.momentum.is_none() && self.mean_reversion.is_none() && self.breakout.is_none()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Err(ConfigError::Invalid(
                "no candidate families configured".into(),
            ));
        }
        if let Some(grid) = &self.momentum {
            if grid.lookbacks.is_empty()
                || grid.thresholds.is_empty()
                || grid.confirm_bars.is_empty()
            {
                return Err(ConfigError::Invalid("momentum grid has an empty axis".into()));
            }
            if grid.lookbacks.contains(&0) {
                return Err(ConfigError::Invalid("momentum lookback must be >= 1".into()));
            }
            if grid.thresholds.iter().any(|&t| t <= 0.0) {
                return Err(ConfigError::Invalid(
                    "momentum thresholds must be positive".into(),
                ));
            }
            if grid.confirm_bars.contains(&0) {
                return Err(ConfigError::Invalid(
                    "momentum confirm_bars must be >= 1".into(),
                ));
            }
        }
        if let Some(grid) = &self.mean_reversion {
            if grid.lookbacks.is_empty() || grid.entry_z.is_empty() || grid.exit_z.is_empty() {
                return Err(ConfigError::Invalid(
                    "mean_reversion grid has an empty axis".into(),
                ));
            }
            if grid.lookbacks.iter().any(|&l| l < 2) {
                return Err(ConfigError::Invalid(
                    "mean_reversion lookback must be >= 2".into(),
                ));
            }
            if grid.entry_z.iter().any(|&z| z <= 0.0) {
                return Err(ConfigError::Invalid(
                    "mean_reversion entry_z must be positive".into(),
                ));
            }
            if grid.exit_z.iter().any(|&z| z < 0.0) {
                return Err(ConfigError::Invalid(
                    "mean_reversion exit_z must be non-negative".into(),
                ));
            }
        }
        if let Some(grid) = &self.breakout {
            if grid.lookbacks.is_empty() {
                return Err(ConfigError::Invalid("breakout grid has an empty axis".into()));
            }
            if grid.lookbacks.contains(&0) {
                return Err(ConfigError::Invalid("breakout lookback must be >= 1".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumGrid {
    pub lookbacks: Vec<usize>,
    pub thresholds: Vec<f64>,
    pub confirm_bars: Vec<usize>,
}

impl Default for MomentumGrid {
    fn default() -> Self {
        Self {
            lookbacks: vec![6, 12, 24],
            thresholds: vec![0.01, 0.02],
            confirm_bars: vec![1, 2],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversionGrid {
    pub lookbacks: Vec<usize>,
    pub entry_z: Vec<f64>,
    pub exit_z: Vec<f64>,
}

impl Default for MeanReversionGrid {
    fn default() -> Self {
        Self {
            lookbacks: vec![12, 24],
            entry_z: vec![1.5, 2.0],
            exit_z: vec![0.5],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutGrid {
    pub lookbacks: Vec<usize>,
}

impl Default for BreakoutGrid {
    fn default() -> Self {
        Self {
            lookbacks: vec![12, 24, 48],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
