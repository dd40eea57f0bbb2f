//! Synthetic price series — seeded bounded random walk.
//!
//! For demos and tests only: the evaluation pipeline itself never touches
//! an RNG. The walk is clamped to the open-interval probability range that
//! outcome-token prices live in, and identical seeds reproduce identical
//! series regardless of platform.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use edgelab_core::domain::PriceBar;

pub const PRICE_FLOOR: f64 = 0.01;
pub const PRICE_CEILING: f64 = 0.99;

/// Generate `n` hourly bars starting at the unix epoch.
///
/// Each step adds `drift` plus a uniform shock in ±`volatility`, clamped
/// to [`PRICE_FLOOR`, `PRICE_CEILING`].
pub fn random_walk_bars(
    n: usize,
    start_price: f64,
    drift: f64,
    volatility: f64,
    seed: u64,
) -> Vec<PriceBar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = start_price.clamp(PRICE_FLOOR, PRICE_CEILING);
    let start: DateTime<Utc> = DateTime::UNIX_EPOCH;

    (0..n)
        .map(|i| {
            if i > 0 {
                let shock: f64 = rng.gen_range(-1.0..1.0);
                price = (price + drift + shock * volatility).clamp(PRICE_FLOOR, PRICE_CEILING);
            }
            PriceBar::new(start + Duration::hours(i as i64), price)
        })
        .collect()
}
