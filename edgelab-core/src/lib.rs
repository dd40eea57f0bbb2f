//! Edgelab Core — engine, domain types, metrics, regime profiling, strategy
//! families.
//!
//! This crate contains the computational heart of the backtesting system:
//! - Domain types (price bars, position sides, trade records)
//! - Bar-by-bar backtest loop with risk exits and bps cost frictions
//! - Pure metrics library (Sharpe, Sortino, drawdown, Ulcer, tail ratio, …)
//! - Market regime profiler with discrete bucket labels
//! - Strategy capability trait plus three built-in families
//!
//! Everything here is synchronous, deterministic, and free of I/O; the
//! orchestration layer lives in `edgelab-runner`.

pub mod domain;
pub mod engine;
pub mod metrics;
pub mod regime;
pub mod strategies;
pub mod strategy;
