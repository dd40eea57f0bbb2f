//! PriceBar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observation of an outcome token's price.
///
/// Prediction-market prices are probabilities, so `price` normally lives in
/// (0, 1), but nothing in the engine depends on that range. Series handed to
/// the engine must be ascending in `timestamp` with no duplicates — that is
/// the caller's contract, upheld by the data loader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PriceBar {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Returns true if the series is strictly ascending in timestamp.
pub fn is_strictly_ordered(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(secs: i64, price: f64) -> PriceBar {
        PriceBar::new(DateTime::from_timestamp(secs, 0).unwrap(), price)
    }

    #[test]
    fn ordered_series_detected() {
        let bars = vec![bar(0, 0.5), bar(60, 0.51), bar(120, 0.49)];
        assert!(is_strictly_ordered(&bars));
    }

    #[test]
    fn duplicate_timestamp_rejected() {
        let bars = vec![bar(0, 0.5), bar(60, 0.51), bar(60, 0.52)];
        assert!(!is_strictly_ordered(&bars));
    }

    #[test]
    fn empty_and_single_are_ordered() {
        assert!(is_strictly_ordered(&[]));
        assert!(is_strictly_ordered(&[bar(0, 0.5)]));
    }

    #[test]
    fn serialization_roundtrip() {
        let b = bar(3600, 0.42);
        let json = serde_json::to_string(&b).unwrap();
        let deser: PriceBar = serde_json::from_str(&json).unwrap();
        assert_eq!(b, deser);
    }
}
