//! CSV bar loading.
//!
//! Expects `timestamp,price` rows with unix-second timestamps, strictly
//! ascending. The loader enforces the ordering contract the engine relies
//! on, so a series that survives loading needs no further validation.

use std::path::Path;

use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;

use edgelab_core::domain::PriceBar;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {timestamp} is not a valid unix timestamp")]
    InvalidTimestamp { row: usize, timestamp: i64 },
    #[error("row {row}: timestamps must be strictly ascending")]
    OutOfOrder { row: usize },
    #[error("row {row}: price {price} is not finite")]
    BadPrice { row: usize, price: f64 },
}

#[derive(Debug, Deserialize)]
struct BarRow {
    timestamp: i64,
    price: f64,
}

/// Load a bar series from a `timestamp,price` CSV file.
pub fn load_bars_csv(path: &Path) -> Result<Vec<PriceBar>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars: Vec<PriceBar> = Vec::new();

    for (index, record) in reader.deserialize::<BarRow>().enumerate() {
        // Header is line 1; data rows are 1-based after it.
        let row = index + 2;
        let parsed = record?;
        if !parsed.price.is_finite() {
            return Err(LoadError::BadPrice {
                row,
                price: parsed.price,
            });
        }
        let timestamp = DateTime::from_timestamp(parsed.timestamp, 0).ok_or(
            LoadError::InvalidTimestamp {
                row,
                timestamp: parsed.timestamp,
            },
        )?;
        if bars.last().is_some_and(|last| timestamp <= last.timestamp) {
            return Err(LoadError::OutOfOrder { row });
        }
        bars.push(PriceBar::new(timestamp, parsed.price));
    }
    Ok(bars)
}
