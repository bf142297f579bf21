//! # Price Provider
//!
//! The consumed market-data contract. Implementations deliver one asset's
//! close history per call; a failed or empty fetch is a per-asset
//! [`Error::DataUnavailable`](crate::error::Error::DataUnavailable), which
//! the engine treats as exclusion, not as a fatal condition.

use chrono::NaiveDate;

use crate::error::Result;
use crate::market::series::PriceSeries;

/// Source of historical close prices.
pub trait PriceProvider {
  /// Fetch the close history for `ticker` over `[start, end)`, start
  /// inclusive and end exclusive. Blocking; one attempt per call.
  fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}
