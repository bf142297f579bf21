//! # Return Statistics
//!
//! $$
//! r_t = \frac{p_t}{p_{t-1}} - 1,\qquad
//! \hat\Sigma_{ij} = \frac{1}{M-1}\sum_{t=1}^{M}(r_{ti}-\bar r_i)(r_{tj}-\bar r_j)
//! $$
//!
//! Per-asset mean simple returns and the sample covariance matrix over an
//! aligned price table. Pure functions of their input.

use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::Error;
use crate::error::Result;
use crate::market::series::PriceTable;

/// Mean return vector and return covariance matrix for one price table.
#[derive(Clone, Debug)]
pub struct ReturnStatistics {
  /// Arithmetic mean simple return per asset.
  pub mean: Array1<f64>,
  /// Sample covariance matrix, symmetric with non-negative diagonal.
  pub covariance: Array2<f64>,
}

impl ReturnStatistics {
  /// Minimum return periods for the (M-1)-denominator estimator.
  pub const MIN_RETURN_PERIODS: usize = 2;

  /// Compute statistics for `table`.
  ///
  /// Requires at least [`Self::MIN_RETURN_PERIODS`] return periods, i.e.
  /// one more aligned observation than that; a table with fewer makes the
  /// sample covariance degenerate and is rejected with
  /// [`Error::InsufficientData`].
  pub fn compute(table: &PriceTable) -> Result<Self> {
    let returns = simple_returns(table);
    let periods = returns.nrows();

    if periods < Self::MIN_RETURN_PERIODS {
      return Err(Error::InsufficientData {
        ticker: "*".to_string(),
        observations: table.n_observations(),
        required: Self::MIN_RETURN_PERIODS + 1,
      });
    }

    let n = returns.ncols();
    let mean = returns.sum_axis(Axis(0)) / periods as f64;

    let mut covariance = Array2::zeros((n, n));
    for i in 0..n {
      let di = &returns.column(i) - mean[i];
      for j in i..n {
        let dj = &returns.column(j) - mean[j];
        let c = di.dot(&dj) / (periods - 1) as f64;
        covariance[[i, j]] = c;
        covariance[[j, i]] = c;
      }
    }

    if mean.iter().any(|m| !m.is_finite()) || covariance.iter().any(|c| !c.is_finite()) {
      return Err(Error::InvalidSeries {
        ticker: "*".to_string(),
        reason: "non-finite return statistics".to_string(),
      });
    }

    Ok(Self { mean, covariance })
  }

  pub fn n_assets(&self) -> usize {
    self.mean.len()
  }
}

/// Per-period simple returns, rows = periods, cols = assets. The first
/// observation has no predecessor and produces no row.
fn simple_returns(table: &PriceTable) -> Array2<f64> {
  let closes = table.closes();
  let (t, n) = closes.dim();
  let mut returns = Array2::zeros((t - 1, n));

  for row in 1..t {
    for col in 0..n {
      returns[[row - 1, col]] = closes[[row, col]] / closes[[row - 1, col]] - 1.0;
    }
  }

  returns
}
