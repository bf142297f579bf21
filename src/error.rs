//! # Errors
//!
//! Failure taxonomy for the allocation pipeline. Per-asset data failures
//! are recoverable by exclusion; everything else aborts the run.

use thiserror::Error;

/// Errors produced by the market-data and allocation layers.
#[derive(Debug, Error)]
pub enum Error {
  /// The provider could not deliver a usable series for a ticker. When the
  /// whole universe is empty the engine reports this with ticker `"*"`.
  #[error("no data available for {ticker}: {reason}")]
  DataUnavailable { ticker: String, reason: String },

  /// Too few aligned observations to estimate return statistics.
  #[error("insufficient data for {ticker}: {observations} aligned observations, {required} required")]
  InsufficientData {
    ticker: String,
    observations: usize,
    required: usize,
  },

  /// A price series violates its construction invariants.
  #[error("invalid series for {ticker}: {reason}")]
  InvalidSeries { ticker: String, reason: String },

  /// The solver terminated without a converged weight vector.
  #[error("optimization failed: {status}")]
  Optimization { status: String },
}

pub type Result<T> = std::result::Result<T, Error>;
