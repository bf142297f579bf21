//! # Portfolio Types
//!
//! $$
//! \mathbf{w}\in[0,1]^N,\quad \textstyle\sum_i w_i = 1
//! $$
//!
//! Request, configuration and result containers for the allocation
//! pipeline.

use chrono::NaiveDate;
use ndarray::Array1;

use crate::market::series::PriceTable;

/// Parameters of one allocation run. Explicit inputs, no ambient state:
/// two identical requests produce identical reports.
#[derive(Clone, Debug)]
pub struct AllocationRequest {
  /// Requested universe; assets whose fetch fails are excluded.
  pub tickers: Vec<String>,
  /// History window start, inclusive.
  pub start: NaiveDate,
  /// History window end, exclusive.
  pub end: NaiveDate,
}

/// Solver tuning for the weight optimizer.
#[derive(Clone, Copy, Debug)]
pub struct OptimizerConfig {
  /// Cost standard-deviation tolerance declaring the simplex converged.
  pub sd_tolerance: f64,
  /// Iteration budget before the solve is declared non-convergent.
  pub max_iters: u64,
}

impl Default for OptimizerConfig {
  fn default() -> Self {
    Self {
      sd_tolerance: 1e-8,
      max_iters: 5000,
    }
  }
}

/// Results payload handed to renderers.
#[derive(Clone, Debug)]
pub struct AllocationReport {
  /// Assets that survived fetching, in table order.
  pub tickers: Vec<String>,
  /// Optimized weights in ticker order, each in [0,1], summing to 1.
  pub weights: Array1<f64>,
  /// Expected per-period portfolio return.
  pub expected_return: f64,
  /// Per-period portfolio volatility.
  pub volatility: f64,
  /// Last aligned close per asset, in ticker order.
  pub current_prices: Array1<f64>,
  /// Aligned price history backing a line-chart view.
  pub history: PriceTable,
}

impl AllocationReport {
  /// Ticker/weight pairs in table order.
  pub fn weight_pairs(&self) -> Vec<(&str, f64)> {
    self
      .tickers
      .iter()
      .map(String::as_str)
      .zip(self.weights.iter().copied())
      .collect()
  }
}
