//! Channel breakout — closes beyond the trailing channel enter, the
//! midline exits.

use crate::domain::{PositionSide, PriceBar};
use crate::strategy::{Signal, Strategy};

/// Enters Long above the trailing `lookback`-bar high, Short below the
/// trailing low, and exits once price crosses back over the channel
/// midline. The channel excludes the current bar.
#[derive(Debug, Clone)]
pub struct ChannelBreakout {
    pub lookback: usize,
}

impl ChannelBreakout {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback >= 1, "lookback must be >= 1");
        Self { lookback }
    }

    pub fn default_params() -> Self {
        Self::new(24)
    }

    fn channel(&self, bars: &[PriceBar], index: usize) -> (f64, f64) {
        let window = &bars[index - self.lookback..index];
        let mut high = f64::NEG_INFINITY;
        let mut low = f64::INFINITY;
        for bar in window {
            high = high.max(bar.price);
            low = low.min(bar.price);
        }
        (high, low)
    }
}

impl Strategy for ChannelBreakout {
    fn name(&self) -> &str {
        "channel_breakout"
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
        let (high, low) = self.channel(bars, index);
        let mid = (high + low) / 2.0;
        let price = bars[index].price;

        if price > high && current != PositionSide::Long {
            return Some(Signal::new(
                PositionSide::Long,
                format!("close {price:.4} above {}-bar channel high {high:.4}", self.lookback),
            ));
        }
        if price < low && current != PositionSide::Short {
            return Some(Signal::new(
                PositionSide::Short,
                format!("close {price:.4} below {}-bar channel low {low:.4}", self.lookback),
            ));
        }
        match current {
            PositionSide::Long if price < mid => Some(Signal::new(
                PositionSide::Flat,
                format!("close {price:.4} back under channel midline {mid:.4}"),
            )),
            PositionSide::Short if price > mid => Some(Signal::new(
                PositionSide::Flat,
                format!("close {price:.4} back over channel midline {mid:.4}"),
            )),
            _ => None,
        }
    }
}
