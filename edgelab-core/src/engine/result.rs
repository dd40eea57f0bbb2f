//! Immutable per-run backtest output.

use serde::{Deserialize, Serialize};

use crate::domain::TradeRecord;

/// Scalar performance summary of one backtest run.
///
/// All values are defined for degenerate inputs: empty or constant series
/// resolve to 0.0, and only `profit_factor`, `tail_ratio`, and
/// `recovery_factor` may legitimately be +∞.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub bar_count: usize,
    pub trade_count: usize,
    pub risk_event_count: usize,
    /// Net cumulative pnl, costs included.
    pub total_pnl: f64,
    /// Pnl before transaction costs: `total_pnl + total_costs`.
    pub gross_pnl: f64,
    pub total_costs: f64,
    /// Hit rate of the bar-level, trade-coincident win/loss tally.
    pub win_rate: f64,
    /// Mean positive per-bar return over the whole series.
    pub avg_win: f64,
    /// Mean magnitude of negative per-bar returns over the whole series.
    pub avg_loss: f64,
    pub expectancy: f64,
    pub sharpe: f64,
    pub sortino: f64,
    /// Largest peak-to-trough equity decline, in pnl units.
    pub max_drawdown: f64,
    pub profit_factor: f64,
    pub ulcer_index: f64,
    pub tail_ratio: f64,
    pub recovery_factor: f64,
    /// Fraction of iterated bars holding a nonzero position.
    pub exposure: f64,
}

impl BacktestMetrics {
    /// All-zero metrics for an empty or unusable series.
    pub fn empty(bar_count: usize) -> Self {
        Self {
            bar_count,
            trade_count: 0,
            risk_event_count: 0,
            total_pnl: 0.0,
            gross_pnl: 0.0,
            total_costs: 0.0,
            win_rate: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            expectancy: 0.0,
            sharpe: 0.0,
            sortino: 0.0,
            max_drawdown: 0.0,
            profit_factor: 0.0,
            ulcer_index: 0.0,
            tail_ratio: 0.0,
            recovery_factor: 0.0,
            exposure: 0.0,
        }
    }
}

/// Complete output of one backtest run. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub token_id: String,
    pub market_question: String,
    pub trades: Vec<TradeRecord>,
    /// Cumulative net pnl per bar; same length as the input series, and
    /// `equity_curve[0] == 0.0` whenever the series is non-empty.
    pub equity_curve: Vec<f64>,
    /// Per-bar equity increments from bar 1 on: `bars.len() - 1` entries.
    pub returns: Vec<f64>,
    pub metrics: BacktestMetrics,
}
