//! Percentile-rank scoring — one weighted [0, 1] score per candidate.
//!
//! Raw metrics live on wildly different scales, and several can be
//! legitimately infinite. Fractional ranks are immune to both problems:
//! every metric lands on a comparable [0, 1] axis before the weighted
//! combination, so a single ±∞ outlier cannot dominate the score.

use std::collections::BTreeMap;

use crate::evaluator::{CandidateEvaluation, CandidateMetrics};

/// One axis of the ranking: what to read, which way is better, how much
/// it counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMetric {
    TestPnl,
    Sharpe,
    Sortino,
    Consistency,
    Drawdown,
    OverfitPenalty,
    TailPenalty,
}

impl RankMetric {
    /// All ranking axes; weights sum to 1.0.
    pub const ALL: [RankMetric; 7] = [
        Self::TestPnl,
        Self::Sharpe,
        Self::Sortino,
        Self::Consistency,
        Self::Drawdown,
        Self::OverfitPenalty,
        Self::TailPenalty,
    ];

    pub fn extract(self, metrics: &CandidateMetrics) -> f64 {
        match self {
            Self::TestPnl => metrics.avg_test_pnl,
            Self::Sharpe => metrics.avg_sharpe,
            Self::Sortino => metrics.avg_sortino,
            Self::Consistency => metrics.consistency,
            Self::Drawdown => metrics.avg_drawdown,
            Self::OverfitPenalty => metrics.overfit_penalty,
            Self::TailPenalty => metrics.tail_penalty,
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Self::TestPnl => 0.22,
            Self::Sharpe => 0.20,
            Self::Sortino => 0.18,
            Self::Consistency => 0.15,
            Self::Drawdown => 0.10,
            Self::OverfitPenalty => 0.10,
            Self::TailPenalty => 0.05,
        }
    }

    pub fn higher_is_better(self) -> bool {
        !matches!(
            self,
            Self::Drawdown | Self::OverfitPenalty | Self::TailPenalty
        )
    }
}

/// Fractional rank of `v` among `values`:
/// (count of values ≤ v, self included, − 1) / (n − 1), flipped when lower
/// is better. A single-element set ranks 1.0.
fn fractional_rank(values: &[f64], v: f64, higher_is_better: bool) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 1.0;
    }
    let at_or_below = values.iter().filter(|x| **x <= v).count();
    let frac = (at_or_below - 1) as f64 / (n - 1) as f64;
    if higher_is_better {
        frac
    } else {
        1.0 - frac
    }
}

/// Score and sort a candidate set.
///
/// Populates each evaluation's `score` with the weighted sum of its seven
/// fractional ranks, optionally scaled by a per-family multiplier (the
/// caller's regime-conditioned preference mapping — typically keyed off a
/// `profile_bucket` lookup upstream), then sorts descending by score.
/// The output is a permutation of the input.
pub fn score_candidate_set(
    mut evals: Vec<CandidateEvaluation>,
    family_weights: Option<&BTreeMap<String, f64>>,
) -> Vec<CandidateEvaluation> {
    if evals.is_empty() {
        return evals;
    }

    let mut scores = vec![0.0_f64; evals.len()];
    for metric in RankMetric::ALL {
        let values: Vec<f64> = evals.iter().map(|e| metric.extract(&e.metrics)).collect();
        for (score, &v) in scores.iter_mut().zip(values.iter()) {
            *score += metric.weight() * fractional_rank(&values, v, metric.higher_is_better());
        }
    }

    for (eval, score) in evals.iter_mut().zip(scores) {
        let multiplier = family_weights
            .and_then(|weights| weights.get(&eval.candidate.family))
            .copied()
            .unwrap_or(1.0);
        eval.score = score * multiplier;
    }

    evals.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    evals
}
