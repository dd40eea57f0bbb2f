//! Expanding-window fold builder.
//!
//! Partitions a bar series into train/test fold pairs: the train window
//! always starts at bar 0 and grows by `step_bars` per fold, while the test
//! window is a fixed-length slice that BEGINS ON THE TRAIN WINDOW'S LAST
//! BAR. The shared boundary bar is intentional — test equity is then
//! contiguous with the train window's ending price.

use serde::{Deserialize, Serialize};

use edgelab_core::domain::PriceBar;

/// Fold generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldConfig {
    /// Length of the first train window.
    pub min_train_bars: usize,
    /// Fixed length of every test window.
    pub test_bars: usize,
    /// Train window growth per fold.
    pub step_bars: usize,
    /// Upper bound on the number of folds produced.
    pub max_folds: usize,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            min_train_bars: 48,
            test_bars: 24,
            step_bars: 24,
            max_folds: 5,
        }
    }
}

/// One train/test fold, as index ranges into the caller's bar series.
///
/// `test_start == train_end - 1`: the test slice opens on the train
/// slice's closing bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldWindow {
    pub fold_index: usize,
    /// Train start (inclusive); always 0 for expanding windows.
    pub train_start: usize,
    /// Train end (exclusive).
    pub train_end: usize,
    /// Test start (inclusive).
    pub test_start: usize,
    /// Test end (exclusive).
    pub test_end: usize,
}

impl FoldWindow {
    pub fn train_slice<'a>(&self, bars: &'a [PriceBar]) -> &'a [PriceBar] {
        &bars[self.train_start..self.train_end]
    }

    pub fn test_slice<'a>(&self, bars: &'a [PriceBar]) -> &'a [PriceBar] {
        &bars[self.test_start..self.test_end]
    }

    pub fn train_len(&self) -> usize {
        self.train_end - self.train_start
    }

    pub fn test_len(&self) -> usize {
        self.test_end - self.test_start
    }
}

/// Build expanding-window folds over `bars`.
///
/// Stops once the next test window would run past the series or
/// `max_folds` is reached. Insufficient data — or a config that could
/// never advance (zero step, sub-2-bar windows) — yields an empty list,
/// never an error; interpretation is the caller's.
pub fn build_expanding_folds(bars: &[PriceBar], config: &FoldConfig) -> Vec<FoldWindow> {
    let mut folds = Vec::new();
    if config.min_train_bars < 2 || config.test_bars < 2 || config.step_bars == 0 {
        return folds;
    }

    let mut train_end = config.min_train_bars;
    while folds.len() < config.max_folds {
        let test_start = train_end - 1;
        let test_end = test_start + config.test_bars;
        if test_end > bars.len() {
            break;
        }
        folds.push(FoldWindow {
            fold_index: folds.len(),
            train_start: 0,
            train_end,
            test_start,
            test_end,
        });
        train_end += config.step_bars;
    }
    folds
}
