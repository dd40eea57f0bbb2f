//! Portfolio builder — ranked candidates to normalized capital weights.
//!
//! Takes ranked (candidate, metrics) entries from many independently
//! evaluated markets, keeps the global top K by score, and converts them
//! into weights that sum to 1. The drawdown damping shrinks risky entries
//! but never reorders positive-score entries relative to one another.

use serde::{Deserialize, Serialize};

/// One ranked candidate from one market's evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub token_id: String,
    pub candidate_id: String,
    pub score: f64,
    pub max_drawdown: f64,
}

/// Normalized capital allocation for one (market, candidate) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeight {
    pub token_id: String,
    pub candidate_id: String,
    pub weight: f64,
}

/// Build drawdown-damped capital weights from ranked entries.
///
/// raw = (max(0, score) / Σ max(0, score)) × 1 / (1 + max(0, drawdown)),
/// renormalized so the weights sum to 1. Non-positive scores weigh zero;
/// when no entry has a positive score, every weight is zero.
pub fn build_portfolio(entries: &[PortfolioEntry], top_k: usize) -> Vec<PortfolioWeight> {
    let mut top: Vec<&PortfolioEntry> = entries.iter().collect();
    top.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top.truncate(top_k);

    let positive_total: f64 = top.iter().map(|e| e.score.max(0.0)).sum();
    if positive_total <= 0.0 {
        return top
            .iter()
            .map(|e| PortfolioWeight {
                token_id: e.token_id.clone(),
                candidate_id: e.candidate_id.clone(),
                weight: 0.0,
            })
            .collect();
    }

    let raw: Vec<f64> = top
        .iter()
        .map(|e| e.score.max(0.0) / positive_total / (1.0 + e.max_drawdown.max(0.0)))
        .collect();
    let raw_total: f64 = raw.iter().sum();

    top.iter()
        .zip(raw)
        .map(|(e, r)| PortfolioWeight {
            token_id: e.token_id.clone(),
            candidate_id: e.candidate_id.clone(),
            weight: r / raw_total,
        })
        .collect()
}
