//! Edgelab Runner — orchestration on top of `edgelab-core`.
//!
//! This crate turns the engine into a selection pipeline:
//! - Expanding-window fold builder
//! - Candidate specs, grids, and content-hash identity
//! - Parallel (candidate × fold) evaluator
//! - Percentile-rank scorer with optional regime bias
//! - Walk-forward selector with overfit diagnostics
//! - Portfolio weight builder
//! - TOML sweep configuration, CSV loading, synthetic series

pub mod candidates;
pub mod config;
pub mod data_loader;
pub mod evaluator;
pub mod folds;
pub mod portfolio;
pub mod ranker;
pub mod synthetic;
pub mod walk_forward;

pub use candidates::{build_grid, CandidateDescriptor, CandidateSpec, StrategyFactory};
pub use config::{
    BreakoutGrid, CandidateGridConfig, ConfigError, MeanReversionGrid, MomentumGrid, SweepConfig,
};
pub use data_loader::{load_bars_csv, LoadError};
pub use evaluator::{
    evaluate_candidates, CandidateEvaluation, CandidateMetrics, EvaluationRequest, FoldRun,
};
pub use folds::{build_expanding_folds, FoldConfig, FoldWindow};
pub use portfolio::{build_portfolio, PortfolioEntry, PortfolioWeight};
pub use ranker::{score_candidate_set, RankMetric};
pub use synthetic::random_walk_bars;
pub use walk_forward::{
    run_walk_forward, WalkForwardError, WalkForwardReport, WalkForwardRequest,
    MIN_WALK_FORWARD_BARS,
};
