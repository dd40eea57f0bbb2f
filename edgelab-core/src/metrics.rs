//! Performance metrics — pure statistical functions over return and equity
//! series.
//!
//! Every function is total: degenerate inputs (empty series, zero variance,
//! empty downside set) resolve to 0.0, except where an infinity is the
//! mathematically correct value (profit factor with no losses, recovery
//! factor with gains and no drawdown, tail ratio with a zero 5th
//! percentile). None of them ever returns NaN for finite input.

/// Arithmetic mean. Empty input → 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator). Fewer than 2 values → 0.0.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Percentile via linear interpolation between adjacent order statistics.
///
/// `p` is in [0, 100]; values outside are clamped. Empty input → 0.0.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let p = p.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Lag-k autocorrelation. Series shorter than `lag + 2` or with zero
/// variance → 0.0.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if values.len() < lag + 2 {
        return 0.0;
    }
    let m = mean(values);
    let denom: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    if denom < 1e-15 {
        return 0.0;
    }
    let numer: f64 = values
        .windows(lag + 1)
        .map(|w| (w[0] - m) * (w[lag] - m))
        .sum();
    numer / denom
}

/// Sharpe ratio scaled by √N over per-bar returns: mean / std × √N.
///
/// Zero variance or fewer than 2 returns → 0.0.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let sd = std_dev(returns);
    if sd < 1e-15 {
        return 0.0;
    }
    mean(returns) / sd * (returns.len() as f64).sqrt()
}

/// Sortino ratio: mean return over downside deviation, scaled by √N.
///
/// The downside deviation uses only negative returns, normalized by the
/// full series length. No negative returns → 0.0.
pub fn sortino_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let downside_sq: f64 = returns.iter().filter(|&&r| r < 0.0).map(|r| r * r).sum();
    if downside_sq <= 0.0 {
        return 0.0;
    }
    let downside_std = (downside_sq / returns.len() as f64).sqrt();
    if downside_std < 1e-15 {
        return 0.0;
    }
    mean(returns) / downside_std * (returns.len() as f64).sqrt()
}

/// Maximum drawdown of an equity curve in absolute pnl units:
/// the largest running-peak-to-trough decline. Always ≥ 0.
pub fn max_equity_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        let dd = peak - eq;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Profit factor: gross profit / |gross loss| over per-bar returns.
///
/// No losses with some profit → +∞; neither profits nor losses → 0.0.
pub fn profit_factor(returns: &[f64]) -> f64 {
    let gross_profit: f64 = returns.iter().filter(|&&r| r > 0.0).sum();
    let gross_loss: f64 = returns.iter().filter(|&&r| r < 0.0).map(|r| r.abs()).sum();
    if gross_loss < 1e-15 {
        return if gross_profit > 0.0 { f64::INFINITY } else { 0.0 };
    }
    gross_profit / gross_loss
}

/// Ulcer index: root-mean-square of the percent drawdown from the running
/// equity peak.
///
/// Bars before the peak turns positive contribute 0 (a percent decline
/// from a non-positive peak is undefined).
pub fn ulcer_index(equity: &[f64]) -> f64 {
    if equity.is_empty() {
        return 0.0;
    }
    let mut peak = f64::NEG_INFINITY;
    let mut sum_sq = 0.0;
    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd_pct = (peak - eq) / peak * 100.0;
            sum_sq += dd_pct * dd_pct;
        }
    }
    (sum_sq / equity.len() as f64).sqrt()
}

/// Tail ratio: |p95 return / p5 return|.
///
/// Zero 5th percentile → +∞ when the 95th is nonzero, else 0.0.
pub fn tail_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let p95 = percentile(returns, 95.0);
    let p5 = percentile(returns, 5.0);
    if p5.abs() < 1e-15 {
        return if p95.abs() > 1e-15 { f64::INFINITY } else { 0.0 };
    }
    (p95 / p5).abs()
}

/// Expectancy: win_rate × avg_win − (1 − win_rate) × avg_loss.
///
/// `avg_loss` is a magnitude (≥ 0).
pub fn expectancy(win_rate: f64, avg_win: f64, avg_loss: f64) -> f64 {
    win_rate * avg_win - (1.0 - win_rate) * avg_loss
}

/// Recovery factor (Calmar-style): total pnl / max drawdown.
///
/// Zero drawdown → +∞ when pnl is positive, else 0.0.
pub fn recovery_factor(total_pnl: f64, max_drawdown: f64) -> f64 {
    if max_drawdown < 1e-15 {
        return if total_pnl > 0.0 { f64::INFINITY } else { 0.0 };
    }
    total_pnl / max_drawdown
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Mean / std ──

    #[test]
    fn mean_basic() {
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn std_dev_known() {
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&v) - 2.13809).abs() < 1e-4);
    }

    #[test]
    fn std_dev_degenerate() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[1.0]), 0.0);
        assert_eq!(std_dev(&[3.0, 3.0, 3.0]), 0.0);
    }

    // ── Percentile ──

    #[test]
    fn percentile_endpoints() {
        let v = [5.0, 1.0, 3.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 100.0), 5.0);
    }

    #[test]
    fn percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        // rank = 0.5 * 3 = 1.5 → halfway between 2 and 3
        assert!((percentile(&v, 50.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn percentile_empty_is_zero() {
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    // ── Autocorrelation ──

    #[test]
    fn autocorrelation_alternating_is_negative() {
        let v = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        assert!(autocorrelation(&v, 1) < -0.5);
    }

    #[test]
    fn autocorrelation_trending_is_positive() {
        let v: Vec<f64> = (0..50).map(|i| i as f64).collect();
        assert!(autocorrelation(&v, 1) > 0.8);
    }

    #[test]
    fn autocorrelation_degenerate() {
        assert_eq!(autocorrelation(&[1.0, 2.0], 1), 0.0);
        assert_eq!(autocorrelation(&[5.0, 5.0, 5.0, 5.0], 1), 0.0);
    }

    // ── Sharpe / Sortino ──

    #[test]
    fn sharpe_zero_variance_is_zero() {
        assert_eq!(sharpe_ratio(&[0.01, 0.01, 0.01]), 0.0);
    }

    #[test]
    fn sharpe_positive_for_mostly_up() {
        let r = [0.01, 0.02, -0.005, 0.015, 0.01, -0.002, 0.02];
        assert!(sharpe_ratio(&r) > 0.0);
    }

    #[test]
    fn sharpe_scales_with_sqrt_n() {
        let r4 = [0.01, -0.005, 0.02, 0.015];
        let manual = mean(&r4) / std_dev(&r4) * 2.0;
        assert!((sharpe_ratio(&r4) - manual).abs() < 1e-12);
    }

    #[test]
    fn sortino_no_downside_is_zero() {
        assert_eq!(sortino_ratio(&[0.01, 0.02, 0.0, 0.03]), 0.0);
    }

    #[test]
    fn sortino_with_downside_is_finite() {
        let r = [0.01, -0.02, 0.03, -0.01, 0.02];
        let s = sortino_ratio(&r);
        assert!(s.is_finite());
        assert!(s > 0.0);
    }

    // ── Drawdown ──

    #[test]
    fn drawdown_known() {
        // Peak 1.0, trough -2.0 → drawdown 3.0
        assert_eq!(max_equity_drawdown(&[0.0, 0.0, 1.0, -2.0]), 3.0);
    }

    #[test]
    fn drawdown_monotonic_is_zero() {
        assert_eq!(max_equity_drawdown(&[0.0, 1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn drawdown_empty_is_zero() {
        assert_eq!(max_equity_drawdown(&[]), 0.0);
    }

    // ── Profit factor ──

    #[test]
    fn profit_factor_mixed() {
        // +0.8 / 0.2 = 4.0
        let r = [0.5, -0.2, 0.3];
        assert!((profit_factor(&r) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn profit_factor_no_losses_is_infinite() {
        assert_eq!(profit_factor(&[0.1, 0.2]), f64::INFINITY);
    }

    #[test]
    fn profit_factor_flat_is_zero() {
        assert_eq!(profit_factor(&[0.0, 0.0]), 0.0);
        assert_eq!(profit_factor(&[]), 0.0);
    }

    // ── Ulcer ──

    #[test]
    fn ulcer_no_drawdown_is_zero() {
        assert_eq!(ulcer_index(&[0.0, 1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn ulcer_positive_under_drawdown() {
        let u = ulcer_index(&[0.0, 2.0, 1.0, 2.0]);
        assert!(u > 0.0);
        assert!(u.is_finite());
    }

    #[test]
    fn ulcer_ignores_nonpositive_peak() {
        // Equity never exceeds 0 → no defined percent drawdown → 0
        assert_eq!(ulcer_index(&[0.0, -1.0, -2.0]), 0.0);
    }

    // ── Tail ratio ──

    #[test]
    fn tail_ratio_symmetric_is_one() {
        let r = [-0.02, -0.01, 0.0, 0.01, 0.02];
        assert!((tail_ratio(&r) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tail_ratio_zero_p5_is_infinite() {
        let r = [0.0, 0.0, 0.0, 0.0, 0.01, 0.02, 0.05, 0.05, 0.05, 0.05, 0.05];
        assert_eq!(tail_ratio(&r), f64::INFINITY);
    }

    #[test]
    fn tail_ratio_all_zero_is_zero() {
        assert_eq!(tail_ratio(&[0.0, 0.0, 0.0]), 0.0);
    }

    // ── Expectancy / recovery ──

    #[test]
    fn expectancy_known() {
        // 0.6 * 2 - 0.4 * 1 = 0.8
        assert!((expectancy(0.6, 2.0, 1.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn recovery_factor_edge_cases() {
        assert_eq!(recovery_factor(1.0, 0.0), f64::INFINITY);
        assert_eq!(recovery_factor(0.0, 0.0), 0.0);
        assert_eq!(recovery_factor(-1.0, 0.0), 0.0);
        assert!((recovery_factor(2.0, 4.0) - 0.5).abs() < 1e-12);
    }
}
