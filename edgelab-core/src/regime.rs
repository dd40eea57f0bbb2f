//! Market regime profiler — scalar character descriptors and a discrete
//! bucket label.
//!
//! The profile condenses a price series into four normalized descriptors
//! (trendiness, mean reversion, volatility, tail risk). `profile_bucket`
//! discretizes three of them against fixed empirical thresholds into a
//! compound label such as `trend-high:mr-low:vol-high`, usable as a lookup
//! key for regime-conditioned preferences.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;
use crate::metrics;

/// Trendiness threshold: normalized slope above this reads as trending.
pub const TREND_THRESHOLD: f64 = 0.0025;
/// Mean-reversion threshold on the negated lag-1 autocorrelation of diffs.
pub const MEAN_REVERSION_THRESHOLD: f64 = 0.05;
/// Volatility threshold on price-normalized diff dispersion.
pub const VOLATILITY_THRESHOLD: f64 = 0.02;

/// Derived, transient statistical character of a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketProfile {
    /// |OLS slope of price against bar index| / mean price.
    pub trendiness: f64,
    /// Negated lag-1 autocorrelation of first-differenced price.
    pub mean_reversion: f64,
    /// Std of price diffs / mean price.
    pub volatility: f64,
    /// 95th percentile of |price diff| / mean price.
    pub tail_risk: f64,
}

impl MarketProfile {
    fn zero() -> Self {
        Self {
            trendiness: 0.0,
            mean_reversion: 0.0,
            volatility: 0.0,
            tail_risk: 0.0,
        }
    }
}

/// Compute the profile of a series. Fewer than 3 bars, or a zero mean
/// price, produce the all-zero profile.
pub fn compute_market_profile(bars: &[PriceBar]) -> MarketProfile {
    if bars.len() < 3 {
        return MarketProfile::zero();
    }
    let prices: Vec<f64> = bars.iter().map(|b| b.price).collect();
    let mean_price = metrics::mean(&prices);
    if mean_price.abs() < 1e-15 {
        return MarketProfile::zero();
    }

    let diffs: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let abs_diffs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();

    MarketProfile {
        trendiness: ols_slope(&prices).abs() / mean_price,
        mean_reversion: -metrics::autocorrelation(&diffs, 1),
        volatility: metrics::std_dev(&diffs) / mean_price,
        tail_risk: metrics::percentile(&abs_diffs, 95.0) / mean_price,
    }
}

/// Discretize a profile into its compound regime label.
pub fn profile_bucket(profile: &MarketProfile) -> String {
    let trend = level(profile.trendiness, TREND_THRESHOLD);
    let mr = level(profile.mean_reversion, MEAN_REVERSION_THRESHOLD);
    let vol = level(profile.volatility, VOLATILITY_THRESHOLD);
    format!("trend-{trend}:mr-{mr}:vol-{vol}")
}

fn level(value: f64, threshold: f64) -> &'static str {
    if value > threshold {
        "high"
    } else {
        "low"
    }
}

/// Least-squares slope of `values` against their index.
fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = metrics::mean(values);
    let mut numer = 0.0;
    let mut denom = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numer += dx * (y - y_mean);
        denom += dx * dx;
    }
    if denom < 1e-15 {
        return 0.0;
    }
    numer / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn series(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PriceBar::new(DateTime::from_timestamp(i as i64 * 3600, 0).unwrap(), p))
            .collect()
    }

    #[test]
    fn trending_series_scores_high_trendiness() {
        let bars = series(&(0..50).map(|i| 0.30 + i as f64 * 0.005).collect::<Vec<_>>());
        let profile = compute_market_profile(&bars);
        assert!(profile.trendiness > TREND_THRESHOLD);
    }

    #[test]
    fn oscillating_series_scores_high_mean_reversion() {
        let prices: Vec<f64> = (0..60)
            .map(|i| if i % 2 == 0 { 0.45 } else { 0.55 })
            .collect();
        let profile = compute_market_profile(&series(&prices));
        assert!(profile.mean_reversion > MEAN_REVERSION_THRESHOLD);
    }

    #[test]
    fn constant_series_is_all_zero() {
        let profile = compute_market_profile(&series(&[0.5; 40]));
        assert_eq!(profile, MarketProfile::zero());
    }

    #[test]
    fn short_series_is_all_zero() {
        assert_eq!(compute_market_profile(&series(&[0.5, 0.6])), MarketProfile::zero());
    }

    #[test]
    fn bucket_label_format() {
        let profile = MarketProfile {
            trendiness: 0.01,
            mean_reversion: 0.01,
            volatility: 0.05,
            tail_risk: 0.1,
        };
        assert_eq!(profile_bucket(&profile), "trend-high:mr-low:vol-high");
    }

    #[test]
    fn bucket_is_deterministic() {
        let profile = MarketProfile {
            trendiness: 0.001,
            mean_reversion: 0.2,
            volatility: 0.001,
            tail_risk: 0.0,
        };
        assert_eq!(profile_bucket(&profile), profile_bucket(&profile));
        assert_eq!(profile_bucket(&profile), "trend-low:mr-high:vol-low");
    }

    #[test]
    fn threshold_boundary_is_exclusive() {
        let profile = MarketProfile {
            trendiness: TREND_THRESHOLD,
            mean_reversion: MEAN_REVERSION_THRESHOLD,
            volatility: VOLATILITY_THRESHOLD,
            tail_risk: 0.0,
        };
        assert_eq!(profile_bucket(&profile), "trend-low:mr-low:vol-low");
    }
}
