//! Risk and cost configuration for a backtest run.

use serde::{Deserialize, Serialize};

/// Risk overlay applied by the engine. Absent config means no risk logic.
///
/// `stop_loss` and `take_profit` are absolute pnl-per-unit thresholds
/// measured against the position's entry price. The trade throttles
/// (`min_bars_between_trades`, `max_trades`) count every logged trade,
/// risk exits included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub min_bars_between_trades: Option<usize>,
    pub max_trades: Option<usize>,
}

/// Transaction friction in basis points per unit of position change.
///
/// A maker rebate offsets the spread + slippage charge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub spread_bps: f64,
    pub slippage_bps: f64,
    pub maker_rebate_bps: f64,
}

impl CostConfig {
    /// Combined friction as a fraction of notional per unit traded.
    pub fn friction_rate(&self) -> f64 {
        (self.spread_bps + self.slippage_bps - self.maker_rebate_bps) / 10_000.0
    }

    /// Cost of changing position by `units` at `price`.
    pub fn charge(&self, price: f64, units: f64) -> f64 {
        self.friction_rate() * price * units
    }
}
