//! Strategy capability — pluggable rule evaluation over a bar series.
//!
//! Strategies see only price history up to the current bar and their own
//! instance state. They never see equity, costs, or the trade log — the
//! engine owns all position bookkeeping and risk handling.

use crate::domain::{PositionSide, PriceBar};

/// Desired exposure emitted by a strategy for one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub target: PositionSide,
    pub reason: String,
}

impl Signal {
    pub fn new(target: PositionSide, reason: impl Into<String>) -> Self {
        Self {
            target,
            reason: reason.into(),
        }
    }
}

/// Trait for strategies driven bar-by-bar by the engine.
///
/// # Contract
/// - `signal` may read `bars[..=index]` only; later bars are off limits.
/// - The engine never calls `signal` while `index < warmup_bars()`.
/// - Calls may be skipped for arbitrary indices (cooldowns, trade caps);
///   implementations must tolerate gaps in the index sequence.
/// - Returning `None` means "no change".
///
/// Implementations may carry per-instance state (confirmation streaks,
/// cached window statistics). One instance is scoped to exactly one forward
/// pass over one bar slice — evaluation layers build a fresh instance per
/// run rather than sharing one across slices.
pub trait Strategy: Send {
    /// Short machine-friendly name (e.g. "momentum").
    fn name(&self) -> &str;

    /// Bars required before `signal` can produce meaningful output.
    fn warmup_bars(&self) -> usize {
        0
    }

    /// Evaluate at `index` given the current engine position.
    fn signal(
        &mut self,
        bars: &[PriceBar],
        index: usize,
        current: PositionSide,
    ) -> Option<Signal>;
}
