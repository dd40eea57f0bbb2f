//! Candidate evaluator — every (candidate × fold) pair, train and test.
//!
//! Each run gets its own fresh strategy instance over a read-only bar
//! slice, which makes the candidate fan-out embarrassingly parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use edgelab_core::domain::PriceBar;
use edgelab_core::engine::{run_backtest, BacktestMetrics, CostConfig, RiskConfig};
use edgelab_core::metrics;

use crate::candidates::{CandidateDescriptor, CandidateSpec};
use crate::folds::FoldWindow;

/// Inputs for one market's candidate sweep.
#[derive(Debug)]
pub struct EvaluationRequest<'a> {
    pub token_id: &'a str,
    pub market_question: &'a str,
    pub bars: &'a [PriceBar],
    pub risk: Option<&'a RiskConfig>,
    pub costs: Option<&'a CostConfig>,
    pub candidates: &'a [CandidateSpec],
    pub folds: &'a [FoldWindow],
}

/// Train and test metrics for one fold of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldRun {
    pub fold_index: usize,
    pub train: BacktestMetrics,
    pub test: BacktestMetrics,
}

/// Cross-fold aggregate metrics for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetrics {
    pub avg_test_pnl: f64,
    pub median_test_pnl: f64,
    pub avg_sharpe: f64,
    pub avg_sortino: f64,
    pub avg_drawdown: f64,
    pub avg_exposure: f64,
    pub avg_trades: f64,
    /// Fraction of folds whose test pnl was positive.
    pub consistency: f64,
    /// max(0, avg train pnl − avg test pnl): in-sample outperformance.
    pub overfit_penalty: f64,
    /// 90th percentile of per-fold test drawdowns.
    pub tail_penalty: f64,
}

impl CandidateMetrics {
    pub fn aggregate(folds: &[FoldRun]) -> Self {
        let test_pnls: Vec<f64> = folds.iter().map(|f| f.test.total_pnl).collect();
        let train_pnls: Vec<f64> = folds.iter().map(|f| f.train.total_pnl).collect();
        let test_drawdowns: Vec<f64> = folds.iter().map(|f| f.test.max_drawdown).collect();

        let consistency = if folds.is_empty() {
            0.0
        } else {
            test_pnls.iter().filter(|&&p| p > 0.0).count() as f64 / folds.len() as f64
        };

        Self {
            avg_test_pnl: metrics::mean(&test_pnls),
            median_test_pnl: metrics::percentile(&test_pnls, 50.0),
            avg_sharpe: metrics::mean(
                &folds.iter().map(|f| f.test.sharpe).collect::<Vec<_>>(),
            ),
            avg_sortino: metrics::mean(
                &folds.iter().map(|f| f.test.sortino).collect::<Vec<_>>(),
            ),
            avg_drawdown: metrics::mean(&test_drawdowns),
            avg_exposure: metrics::mean(
                &folds.iter().map(|f| f.test.exposure).collect::<Vec<_>>(),
            ),
            avg_trades: metrics::mean(
                &folds
                    .iter()
                    .map(|f| f.test.trade_count as f64)
                    .collect::<Vec<_>>(),
            ),
            consistency,
            overfit_penalty: (metrics::mean(&train_pnls) - metrics::mean(&test_pnls)).max(0.0),
            tail_penalty: metrics::percentile(&test_drawdowns, 90.0),
        }
    }
}

/// One candidate's complete evaluation. `score` stays 0.0 until the
/// ranking pass populates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    pub candidate: CandidateDescriptor,
    pub folds: Vec<FoldRun>,
    pub metrics: CandidateMetrics,
    pub score: f64,
}

/// Run every candidate over every fold, train slice then test slice, each
/// with a fresh strategy instance. Empty candidates or folds produce an
/// empty result rather than an error.
pub fn evaluate_candidates(request: &EvaluationRequest) -> Vec<CandidateEvaluation> {
    if request.candidates.is_empty() || request.folds.is_empty() {
        return Vec::new();
    }

    request
        .candidates
        .par_iter()
        .map(|candidate| {
            let folds: Vec<FoldRun> = request
                .folds
                .iter()
                .map(|fold| {
                    let mut train_strategy = candidate.build_strategy();
                    let train = run_backtest(
                        train_strategy.as_mut(),
                        request.token_id,
                        request.market_question,
                        fold.train_slice(request.bars),
                        request.risk,
                        request.costs,
                    )
                    .metrics;

                    let mut test_strategy = candidate.build_strategy();
                    let test = run_backtest(
                        test_strategy.as_mut(),
                        request.token_id,
                        request.market_question,
                        fold.test_slice(request.bars),
                        request.risk,
                        request.costs,
                    )
                    .metrics;

                    FoldRun {
                        fold_index: fold.fold_index,
                        train,
                        test,
                    }
                })
                .collect();

            let metrics = CandidateMetrics::aggregate(&folds);
            CandidateEvaluation {
                candidate: candidate.descriptor(),
                folds,
                metrics,
                score: 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folds::{build_expanding_folds, FoldConfig};
    use chrono::DateTime;
    use edgelab_core::strategies::Momentum;
    use edgelab_core::strategy::Strategy;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn sawtooth(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let wave = match i % 4 {
                    0 => 0.00,
                    1 => 0.03,
                    2 => 0.00,
                    _ => -0.03,
                };
                PriceBar::new(
                    DateTime::from_timestamp(i as i64 * 3600, 0).unwrap(),
                    0.50 + wave + i as f64 * 0.0002,
                )
            })
            .collect()
    }

    fn momentum_candidate(id: &str, lookback: usize) -> CandidateSpec {
        CandidateSpec::new(
            id,
            "momentum",
            BTreeMap::from([("lookback".to_string(), lookback as f64)]),
            Arc::new(move || Box::new(Momentum::new(lookback, 0.01, 1)) as Box<dyn Strategy>),
        )
    }

    #[test]
    fn one_evaluation_per_candidate_with_all_folds() {
        let bars = sawtooth(200);
        let folds = build_expanding_folds(&bars, &FoldConfig::default());
        let candidates = vec![momentum_candidate("a", 2), momentum_candidate("b", 4)];
        let request = EvaluationRequest {
            token_id: "tok",
            market_question: "q",
            bars: &bars,
            risk: None,
            costs: None,
            candidates: &candidates,
            folds: &folds,
        };

        let evals = evaluate_candidates(&request);
        assert_eq!(evals.len(), 2);
        for eval in &evals {
            assert_eq!(eval.folds.len(), folds.len());
            assert_eq!(eval.score, 0.0);
        }
    }

    #[test]
    fn empty_candidates_or_folds_yield_empty_result() {
        let bars = sawtooth(200);
        let folds = build_expanding_folds(&bars, &FoldConfig::default());
        let candidates = vec![momentum_candidate("a", 2)];

        let no_candidates = EvaluationRequest {
            token_id: "tok",
            market_question: "q",
            bars: &bars,
            risk: None,
            costs: None,
            candidates: &[],
            folds: &folds,
        };
        assert!(evaluate_candidates(&no_candidates).is_empty());

        let no_folds = EvaluationRequest {
            token_id: "tok",
            market_question: "q",
            bars: &bars,
            risk: None,
            costs: None,
            candidates: &candidates,
            folds: &[],
        };
        assert!(evaluate_candidates(&no_folds).is_empty());
    }

    #[test]
    fn parallel_evaluation_is_deterministic() {
        let bars = sawtooth(250);
        let folds = build_expanding_folds(&bars, &FoldConfig::default());
        let candidates: Vec<CandidateSpec> = (2..10)
            .map(|lb| momentum_candidate(&format!("m{lb}"), lb))
            .collect();
        let request = EvaluationRequest {
            token_id: "tok",
            market_question: "q",
            bars: &bars,
            risk: None,
            costs: None,
            candidates: &candidates,
            folds: &folds,
        };

        let a = evaluate_candidates(&request);
        let b = evaluate_candidates(&request);
        assert_eq!(a, b);
    }

    #[test]
    fn aggregate_handles_empty_fold_list() {
        let m = CandidateMetrics::aggregate(&[]);
        assert_eq!(m.avg_test_pnl, 0.0);
        assert_eq!(m.consistency, 0.0);
        assert_eq!(m.tail_penalty, 0.0);
    }

    #[test]
    fn overfit_penalty_is_clamped_at_zero() {
        // Test pnl above train pnl → no penalty.
        let fold = FoldRun {
            fold_index: 0,
            train: {
                let mut m = BacktestMetrics::empty(10);
                m.total_pnl = 0.1;
                m
            },
            test: {
                let mut m = BacktestMetrics::empty(10);
                m.total_pnl = 0.5;
                m
            },
        };
        let agg = CandidateMetrics::aggregate(&[fold]);
        assert_eq!(agg.overfit_penalty, 0.0);
    }
}
