//! Momentum — lookback return beyond a threshold, confirmed over
//! consecutive bars.
//!
//! The confirmation streak is per-instance state: the counter survives
//! between bars of one pass and must never be shared across slices.

use crate::domain::{PositionSide, PriceBar};
use crate::strategy::{Signal, Strategy};

/// Trades in the direction of the `lookback`-bar return once it exceeds
/// `threshold` for `confirm_bars` consecutive evaluations; exits when the
/// return falls back inside the threshold band.
#[derive(Debug, Clone)]
pub struct Momentum {
    pub lookback: usize,
    pub threshold: f64,
    pub confirm_bars: usize,
    pending: PositionSide,
    streak: usize,
}

impl Momentum {
    pub fn new(lookback: usize, threshold: f64, confirm_bars: usize) -> Self {
        assert!(lookback >= 1, "lookback must be >= 1");
        assert!(threshold > 0.0, "threshold must be positive");
        assert!(confirm_bars >= 1, "confirm_bars must be >= 1");
        Self {
            lookback,
            threshold,
            confirm_bars,
            pending: PositionSide::Flat,
            streak: 0,
        }
    }

    pub fn default_params() -> Self {
        Self::new(12, 0.02, 2)
    }

    fn lookback_return(&self, bars: &[PriceBar], index: usize) -> Option<f64> {
        let base = bars[index - self.lookback].price;
        if base.abs() < 1e-15 {
            return None;
        }
        Some((bars[index].price - base) / base)
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn warmup_bars(&self) -> usize {
        self.lookback
    }

    fn signal(
        &mut self,
        bars: &[PriceBar],
        index: usize,
        current: PositionSide,
    ) -> Option<Signal> {
        let ret = self.lookback_return(bars, index)?;

        let desired = if ret > self.threshold {
            PositionSide::Long
        } else if ret < -self.threshold {
            PositionSide::Short
        } else {
            PositionSide::Flat
        };

        if desired == PositionSide::Flat {
            self.pending = PositionSide::Flat;
            self.streak = 0;
            if current != PositionSide::Flat {
                return Some(Signal::new(
                    PositionSide::Flat,
                    format!("{}-bar momentum faded ({ret:+.4})", self.lookback),
                ));
            }
            return None;
        }

        if desired == current {
            self.pending = PositionSide::Flat;
            self.streak = 0;
            return None;
        }

        if desired == self.pending {
            self.streak += 1;
        } else {
            self.pending = desired;
            self.streak = 1;
        }

        if self.streak >= self.confirm_bars {
            self.pending = PositionSide::Flat;
            self.streak = 0;
            return Some(Signal::new(
                desired,
                format!("{}-bar momentum {ret:+.4}", self.lookback),
            ));
        }
        None
    }
}
