//! TradeRecord — append-only log entry for every realized position change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PositionSide;

/// One realized position change, whether signal-driven or a risk exit.
///
/// Records the bar the change happened on; the engine fills at that bar's
/// price. The `reason` string comes from the strategy's signal, or is one of
/// the engine's fixed risk-exit labels ("Risk stop-loss", "Risk take-profit").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub from: PositionSide,
    pub to: PositionSide,
    pub reason: String,
}

impl TradeRecord {
    /// Units of position change (1.0 for enter/exit, 2.0 for a direct flip).
    pub fn size(&self) -> f64 {
        (self.to.value() - self.from.value()).abs()
    }
}
