//! Property tests for engine invariants.
//!
//! Uses proptest to verify, over arbitrary bounded price series:
//! 1. Equity curve shape — length equals bar count, first element is zero
//! 2. Trade log continuity — each trade starts from the previous trade's side
//! 3. Metric totality — no NaN regardless of input
//! 4. Determinism — fresh instances over identical input agree bitwise

use chrono::DateTime;
use proptest::prelude::*;

use edgelab_core::domain::{PositionSide, PriceBar};
use edgelab_core::engine::{run_backtest, CostConfig, RiskConfig};
use edgelab_core::strategies::Momentum;
use edgelab_core::strategy::Signal;

fn to_bars(prices: Vec<f64>) -> Vec<PriceBar> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PriceBar::new(DateTime::from_timestamp(i as i64 * 3600, 0).unwrap(), p))
        .collect()
}

fn arb_prices() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01..0.99_f64, 2..120)
}

struct Silent;

impl edgelab_core::strategy::Strategy for Silent {
    fn name(&self) -> &str {
        "silent"
    }

    fn signal(
        &mut self,
        _bars: &[PriceBar],
        _index: usize,
        _current: PositionSide,
    ) -> Option<Signal> {
        None
    }
}

proptest! {
    /// Equity curve has one point per bar and starts pinned at zero.
    #[test]
    fn equity_curve_shape(prices in arb_prices()) {
        let bars = to_bars(prices);
        let mut strategy = Momentum::new(3, 0.01, 1);
        let result = run_backtest(&mut strategy, "t", "q", &bars, None, None);
        prop_assert_eq!(result.equity_curve.len(), bars.len());
        prop_assert_eq!(result.equity_curve[0], 0.0);
        prop_assert_eq!(result.returns.len(), bars.len() - 1);
    }

    /// Every trade's `from` side equals the previous trade's `to` side,
    /// and the first trade always starts flat.
    #[test]
    fn trade_log_is_continuous(prices in arb_prices()) {
        let bars = to_bars(prices);
        let mut strategy = Momentum::new(2, 0.01, 1);
        let risk = RiskConfig {
            stop_loss: Some(0.05),
            take_profit: Some(0.10),
            ..Default::default()
        };
        let result = run_backtest(&mut strategy, "t", "q", &bars, Some(&risk), None);

        let mut side = PositionSide::Flat;
        for trade in &result.trades {
            prop_assert_eq!(trade.from, side);
            prop_assert_ne!(trade.to, trade.from);
            side = trade.to;
        }
    }

    /// A silent strategy with no risk config never trades and never moves
    /// equity.
    #[test]
    fn silent_strategy_is_inert(prices in arb_prices()) {
        let bars = to_bars(prices);
        let result = run_backtest(&mut Silent, "t", "q", &bars, None, None);
        prop_assert_eq!(result.metrics.trade_count, 0);
        prop_assert_eq!(result.metrics.total_pnl, 0.0);
        prop_assert!(result.equity_curve.iter().all(|&e| e == 0.0));
    }

    /// No metric is ever NaN, and exposure stays in [0, 1].
    #[test]
    fn metrics_are_total(prices in arb_prices()) {
        let bars = to_bars(prices);
        let mut strategy = Momentum::new(2, 0.01, 1);
        let costs = CostConfig { spread_bps: 30.0, slippage_bps: 10.0, maker_rebate_bps: 2.0 };
        let m = run_backtest(&mut strategy, "t", "q", &bars, None, Some(&costs)).metrics;

        for value in [
            m.total_pnl, m.gross_pnl, m.total_costs, m.win_rate, m.avg_win,
            m.avg_loss, m.expectancy, m.sharpe, m.sortino, m.max_drawdown,
            m.profit_factor, m.ulcer_index, m.tail_ratio, m.recovery_factor,
            m.exposure,
        ] {
            prop_assert!(!value.is_nan());
        }
        prop_assert!((0.0..=1.0).contains(&m.exposure));
        prop_assert!(m.max_drawdown >= 0.0);
    }

    /// Fresh instances over identical inputs agree bitwise.
    #[test]
    fn runs_are_deterministic(prices in arb_prices()) {
        let bars = to_bars(prices);
        let risk = RiskConfig { stop_loss: Some(0.08), ..Default::default() };
        let a = run_backtest(&mut Momentum::new(2, 0.01, 1), "t", "q", &bars, Some(&risk), None);
        let b = run_backtest(&mut Momentum::new(2, 0.01, 1), "t", "q", &bars, Some(&risk), None);
        prop_assert_eq!(a, b);
    }
}
