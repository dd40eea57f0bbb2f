//! Property tests for fold generation and portfolio weighting.

use chrono::DateTime;
use proptest::prelude::*;

use edgelab_core::domain::PriceBar;
use edgelab_runner::{build_expanding_folds, build_portfolio, FoldConfig, PortfolioEntry};

fn bars(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            PriceBar::new(
                DateTime::from_timestamp(i as i64 * 3600, 0).unwrap(),
                0.5 + (i % 7) as f64 * 0.01,
            )
        })
        .collect()
}

proptest! {
    /// Every fold fits the series; train windows satisfy the minimum and
    /// test windows the exact configured length.
    #[test]
    fn folds_respect_config(
        series_len in 0usize..400,
        min_train_bars in 2usize..100,
        test_bars in 2usize..60,
        step_bars in 1usize..40,
        max_folds in 1usize..10,
    ) {
        let config = FoldConfig { min_train_bars, test_bars, step_bars, max_folds };
        let series = bars(series_len);
        let folds = build_expanding_folds(&series, &config);

        prop_assert!(folds.len() <= max_folds);
        for fold in &folds {
            prop_assert!(fold.train_len() >= min_train_bars);
            prop_assert_eq!(fold.test_len(), test_bars);
            prop_assert!(fold.test_end <= series.len());
            prop_assert_eq!(fold.test_start, fold.train_end - 1);
        }
    }

    /// With at least one positive score, weights are a probability
    /// distribution over at most top_k entries.
    #[test]
    fn portfolio_weights_are_a_distribution(
        scores in prop::collection::vec(-1.0..1.0_f64, 1..20),
        drawdowns in prop::collection::vec(0.0..2.0_f64, 20),
        top_k in 1usize..10,
    ) {
        let entries: Vec<PortfolioEntry> = scores
            .iter()
            .zip(drawdowns.iter())
            .enumerate()
            .map(|(i, (&score, &drawdown))| PortfolioEntry {
                token_id: format!("tok-{i}"),
                candidate_id: format!("cand-{i}"),
                score,
                max_drawdown: drawdown,
            })
            .collect();

        let weights = build_portfolio(&entries, top_k);
        prop_assert!(weights.len() <= top_k);
        prop_assert!(weights.iter().all(|w| w.weight >= 0.0));

        let total: f64 = weights.iter().map(|w| w.weight).sum();
        if entries.iter().any(|e| e.score > 0.0) {
            // The top_k cut keeps the highest scores, so a positive score
            // always survives it when one exists.
            prop_assert!((total - 1.0).abs() < 1e-9);
        } else {
            prop_assert!(total.abs() < 1e-12);
        }
    }
}
