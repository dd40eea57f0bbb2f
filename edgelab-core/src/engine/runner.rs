//! Bar-by-bar replay loop — the heart of the engine.
//!
//! Per bar, in order:
//! 1. Accrue mark-to-market pnl on the position held entering the bar.
//! 2. Risk-exit check (runs every bar, warmup included).
//! 3. Strategy evaluation, unless warming up, trade-capped, or cooling down.
//! 4. Win/loss tally, equity and return bookkeeping.
//!
//! Fills happen at the current bar's price. Identical inputs produce
//! bit-identical results: no clock, no randomness, no shared state.

use crate::domain::{PositionSide, PriceBar, TradeRecord};
use crate::metrics;
use crate::strategy::Strategy;

use super::config::{CostConfig, RiskConfig};
use super::result::{BacktestMetrics, BacktestResult};

const STOP_LOSS_REASON: &str = "Risk stop-loss";
const TAKE_PROFIT_REASON: &str = "Risk take-profit";

/// Replay `bars` through `strategy`, applying risk exits and costs.
///
/// The strategy instance must be fresh: its internal state is scoped to
/// this one forward pass. Degenerate inputs (empty series, single bar)
/// produce a zeroed result rather than an error.
pub fn run_backtest(
    strategy: &mut dyn Strategy,
    token_id: &str,
    market_question: &str,
    bars: &[PriceBar],
    risk: Option<&RiskConfig>,
    costs: Option<&CostConfig>,
) -> BacktestResult {
    let n = bars.len();
    let mut equity = vec![0.0; n];
    let mut returns = Vec::with_capacity(n.saturating_sub(1));
    let mut trades: Vec<TradeRecord> = Vec::new();

    let mut position = PositionSide::Flat;
    let mut entry_price = 0.0;
    let mut pnl = 0.0;
    let mut total_costs = 0.0;
    let mut risk_events = 0usize;
    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut exposed_bars = 0usize;
    let mut last_trade_bar: Option<usize> = None;
    let warmup = strategy.warmup_bars();

    for i in 1..n {
        let price = bars[i].price;
        let delta = price - bars[i - 1].price;
        let entering = position;
        let bar_pnl = entering.value() * delta;
        pnl += bar_pnl;
        let mut trade_fired = false;

        // Risk exits run before the strategy, warmup or not.
        if let Some(risk) = risk {
            if !position.is_flat() {
                let unrealized = position.value() * (price - entry_price);
                let reason = if risk.stop_loss.is_some_and(|sl| unrealized <= -sl) {
                    Some(STOP_LOSS_REASON)
                } else if risk.take_profit.is_some_and(|tp| unrealized >= tp) {
                    Some(TAKE_PROFIT_REASON)
                } else {
                    None
                };
                if let Some(reason) = reason {
                    let cost = charge(costs, price, position.value().abs());
                    pnl -= cost;
                    total_costs += cost;
                    trades.push(TradeRecord {
                        timestamp: bars[i].timestamp,
                        price,
                        from: position,
                        to: PositionSide::Flat,
                        reason: reason.into(),
                    });
                    position = PositionSide::Flat;
                    risk_events += 1;
                    last_trade_bar = Some(i);
                    trade_fired = true;
                }
            }
        }

        if i >= warmup
            && !trade_cap_reached(risk, trades.len())
            && !in_cooldown(risk, last_trade_bar, i)
        {
            if let Some(signal) = strategy.signal(bars, i, position) {
                if signal.target != position {
                    let units = (signal.target.value() - position.value()).abs();
                    let cost = charge(costs, price, units);
                    pnl -= cost;
                    total_costs += cost;
                    trades.push(TradeRecord {
                        timestamp: bars[i].timestamp,
                        price,
                        from: position,
                        to: signal.target,
                        reason: signal.reason,
                    });
                    if !signal.target.is_flat() {
                        entry_price = price;
                    }
                    position = signal.target;
                    last_trade_bar = Some(i);
                    trade_fired = true;
                }
            }
        }

        // Bar-level win/loss tally, advanced only when a trade fired on a
        // bar whose entering position was nonzero. The bar's mark-to-market
        // increment decides the outcome, not the trade's round-trip pnl.
        if trade_fired && !entering.is_flat() {
            if bar_pnl > 0.0 {
                wins += 1;
            } else {
                losses += 1;
            }
        }

        equity[i] = pnl;
        returns.push(equity[i] - equity[i - 1]);
        if !position.is_flat() {
            exposed_bars += 1;
        }
    }

    let metrics = compute_metrics(
        &equity,
        &returns,
        &trades,
        Counters {
            bar_count: n,
            risk_events,
            wins,
            losses,
            exposed_bars,
            total_costs,
            total_pnl: pnl,
        },
    );

    BacktestResult {
        token_id: token_id.to_string(),
        market_question: market_question.to_string(),
        trades,
        equity_curve: equity,
        returns,
        metrics,
    }
}

struct Counters {
    bar_count: usize,
    risk_events: usize,
    wins: usize,
    losses: usize,
    exposed_bars: usize,
    total_costs: f64,
    total_pnl: f64,
}

fn charge(costs: Option<&CostConfig>, price: f64, units: f64) -> f64 {
    costs.map_or(0.0, |c| c.charge(price, units))
}

fn trade_cap_reached(risk: Option<&RiskConfig>, trade_count: usize) -> bool {
    risk.and_then(|r| r.max_trades)
        .is_some_and(|max| trade_count >= max)
}

fn in_cooldown(risk: Option<&RiskConfig>, last_trade_bar: Option<usize>, i: usize) -> bool {
    match (risk.and_then(|r| r.min_bars_between_trades), last_trade_bar) {
        (Some(min_bars), Some(last)) => i - last < min_bars,
        _ => false,
    }
}

fn compute_metrics(
    equity: &[f64],
    returns: &[f64],
    trades: &[TradeRecord],
    c: Counters,
) -> BacktestMetrics {
    if c.bar_count < 2 {
        return BacktestMetrics::empty(c.bar_count);
    }

    let win_rate = if c.wins + c.losses > 0 {
        c.wins as f64 / (c.wins + c.losses) as f64
    } else {
        0.0
    };

    let gains: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
    let losses_abs: Vec<f64> = returns
        .iter()
        .copied()
        .filter(|r| *r < 0.0)
        .map(f64::abs)
        .collect();
    let avg_win = metrics::mean(&gains);
    let avg_loss = metrics::mean(&losses_abs);

    let max_drawdown = metrics::max_equity_drawdown(equity);

    BacktestMetrics {
        bar_count: c.bar_count,
        trade_count: trades.len(),
        risk_event_count: c.risk_events,
        total_pnl: c.total_pnl,
        gross_pnl: c.total_pnl + c.total_costs,
        total_costs: c.total_costs,
        win_rate,
        avg_win,
        avg_loss,
        expectancy: metrics::expectancy(win_rate, avg_win, avg_loss),
        sharpe: metrics::sharpe_ratio(returns),
        sortino: metrics::sortino_ratio(returns),
        max_drawdown,
        profit_factor: metrics::profit_factor(returns),
        ulcer_index: metrics::ulcer_index(equity),
        tail_ratio: metrics::tail_ratio(returns),
        recovery_factor: metrics::recovery_factor(c.total_pnl, max_drawdown),
        exposure: c.exposed_bars as f64 / (c.bar_count - 1) as f64,
    }
}
