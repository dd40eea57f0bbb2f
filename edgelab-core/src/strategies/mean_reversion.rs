//! Mean reversion — fade z-score extremes against a trailing window.

use crate::domain::{PositionSide, PriceBar};
use crate::metrics;
use crate::strategy::{Signal, Strategy};

/// Shorts prices stretched above the trailing mean, buys prices stretched
/// below it, and exits once the z-score decays inside `exit_z`.
///
/// The z-score uses the `lookback` bars preceding the current one, so the
/// current price never contaminates its own reference window.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    pub lookback: usize,
    pub entry_z: f64,
    pub exit_z: f64,
}

impl MeanReversion {
    pub fn new(lookback: usize, entry_z: f64, exit_z: f64) -> Self {
        assert!(lookback >= 2, "lookback must be >= 2");
        assert!(entry_z > 0.0, "entry_z must be positive");
        assert!(exit_z >= 0.0 && exit_z < entry_z, "exit_z must be in [0, entry_z)");
        Self {
            lookback,
            entry_z,
            exit_z,
        }
    }

    pub fn default_params() -> Self {
        Self::new(20, 2.0, 0.5)
    }

    fn z_score(&self, bars: &[PriceBar], index: usize) -> Option<f64> {
        let window: Vec<f64> = bars[index - self.lookback..index]
            .iter()
            .map(|b| b.price)
            .collect();
        let sd = metrics::std_dev(&window);
        if sd < 1e-15 {
            return None;
        }
        Some((bars[index].price - metrics::mean(&window)) / sd)
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &str {
        "mean_reversion"
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
        let z = self.z_score(bars, index)?;

        if z >= self.entry_z && current != PositionSide::Short {
            return Some(Signal::new(
                PositionSide::Short,
                format!("z-score {z:+.2} above entry band"),
            ));
        }
        if z <= -self.entry_z && current != PositionSide::Long {
            return Some(Signal::new(
                PositionSide::Long,
                format!("z-score {z:+.2} below entry band"),
            ));
        }
        if z.abs() <= self.exit_z && current != PositionSide::Flat {
            return Some(Signal::new(
                PositionSide::Flat,
                format!("z-score {z:+.2} reverted"),
            ));
        }
        None
    }
}
