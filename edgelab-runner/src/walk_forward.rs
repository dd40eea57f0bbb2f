//! Walk-forward selector — single train/test split with overfit
//! diagnostics.
//!
//! A cheaper alternative to the expanding-window evaluator when one
//! held-out window is enough: every candidate is fitted on the train
//! slice, only the winner is evaluated out-of-sample. The overfit score
//! compares in-sample to out-of-sample Sharpe; the robustness score
//! penalizes the gap between them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgelab_core::domain::PriceBar;
use edgelab_core::engine::{run_backtest, BacktestMetrics, BacktestResult, CostConfig, RiskConfig};

use crate::candidates::{CandidateDescriptor, CandidateSpec};

/// Walk-forward refuses to run on fewer bars than this.
pub const MIN_WALK_FORWARD_BARS: usize = 20;

/// Inputs for one walk-forward selection.
#[derive(Debug)]
pub struct WalkForwardRequest<'a> {
    pub token_id: &'a str,
    pub market_question: &'a str,
    pub bars: &'a [PriceBar],
    /// Fraction of the series assigned to the train window.
    pub split_ratio: f64,
    pub candidates: &'a [CandidateSpec],
    pub risk: Option<&'a RiskConfig>,
    pub costs: Option<&'a CostConfig>,
}

/// Outcome of a walk-forward selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardReport {
    pub best: CandidateDescriptor,
    pub candidates_evaluated: usize,
    /// The winner's full train-slice result.
    pub train: BacktestResult,
    /// The winner's full test-slice result (fresh instance).
    pub test: BacktestResult,
    /// |train Sharpe / test Sharpe|; ∞ when the test Sharpe collapses to
    /// zero while the train Sharpe stayed positive.
    pub overfit_score: f64,
    /// test Sharpe − 0.5 × |train Sharpe − test Sharpe|.
    pub robustness_score: f64,
}

#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("insufficient data: {total_bars} bars < minimum {min_bars}")]
    InsufficientData { total_bars: usize, min_bars: usize },
    #[error("no candidates to evaluate")]
    NoCandidates,
}

/// Select the best candidate on the train slice, then evaluate only it on
/// the held-out test slice.
///
/// The split index is `floor(len × split_ratio)` clamped to `[2, len − 1]`,
/// and the test slice starts one bar before the split so its equity is
/// contiguous with the train window's ending price.
pub fn run_walk_forward(
    request: &WalkForwardRequest,
) -> Result<WalkForwardReport, WalkForwardError> {
    let total_bars = request.bars.len();
    if total_bars < MIN_WALK_FORWARD_BARS {
        return Err(WalkForwardError::InsufficientData {
            total_bars,
            min_bars: MIN_WALK_FORWARD_BARS,
        });
    }
    if request.candidates.is_empty() {
        return Err(WalkForwardError::NoCandidates);
    }

    let split_index =
        ((total_bars as f64 * request.split_ratio).floor() as usize).clamp(2, total_bars - 1);
    let train_bars = &request.bars[..split_index];
    let test_bars = &request.bars[split_index - 1..];

    let mut candidates_evaluated = 0;
    let mut best: Option<(&CandidateSpec, BacktestResult)> = None;
    for candidate in request.candidates {
        let mut strategy = candidate.build_strategy();
        let result = run_backtest(
            strategy.as_mut(),
            request.token_id,
            request.market_question,
            train_bars,
            request.risk,
            request.costs,
        );
        candidates_evaluated += 1;

        let is_better = best
            .as_ref()
            .map_or(true, |(_, current)| beats(&result.metrics, &current.metrics));
        if is_better {
            best = Some((candidate, result));
        }
    }

    let Some((winner, train_result)) = best else {
        return Err(WalkForwardError::NoCandidates);
    };

    let mut test_strategy = winner.build_strategy();
    let test_result = run_backtest(
        test_strategy.as_mut(),
        request.token_id,
        request.market_question,
        test_bars,
        request.risk,
        request.costs,
    );

    let train_sharpe = train_result.metrics.sharpe;
    let test_sharpe = test_result.metrics.sharpe;
    let overfit_score = if test_sharpe == 0.0 {
        if train_sharpe > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        (train_sharpe / test_sharpe).abs()
    };
    let robustness_score = test_sharpe - 0.5 * (train_sharpe - test_sharpe).abs();

    Ok(WalkForwardReport {
        best: winner.descriptor(),
        candidates_evaluated,
        train: train_result,
        test: test_result,
        overfit_score,
        robustness_score,
    })
}

/// Train-slice comparator: total pnl, then Sharpe, then lower drawdown.
fn beats(a: &BacktestMetrics, b: &BacktestMetrics) -> bool {
    if a.total_pnl != b.total_pnl {
        return a.total_pnl > b.total_pnl;
    }
    if a.sharpe != b.sharpe {
        return a.sharpe > b.sharpe;
    }
    a.max_drawdown < b.max_drawdown
}
