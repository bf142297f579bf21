//! # Price Series
//!
//! $$
//! \text{close}_{t_1} < \text{close-dates strictly ordered},\quad p_t > 0
//! $$
//!
//! Validated per-asset price history and the aligned multi-asset table the
//! statistics layer consumes. Alignment is an inner join on dates: any row
//! missing a quote for at least one asset is dropped.

use chrono::NaiveDate;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;

use crate::error::Error;
use crate::error::Result;

/// Ordered close-price observations for a single asset.
///
/// Construction enforces the invariants downstream code relies on:
/// matching lengths, strictly increasing dates (which rules out
/// duplicates), and strictly positive, finite prices. Immutable after
/// construction.
#[derive(Clone, Debug)]
pub struct PriceSeries {
  ticker: String,
  dates: Vec<NaiveDate>,
  closes: Vec<f64>,
}

impl PriceSeries {
  pub fn new(ticker: impl Into<String>, dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
    let ticker = ticker.into();

    if dates.len() != closes.len() {
      return Err(Error::InvalidSeries {
        ticker,
        reason: format!("{} dates vs {} closes", dates.len(), closes.len()),
      });
    }

    if dates.is_empty() {
      return Err(Error::InvalidSeries {
        ticker,
        reason: "empty series".to_string(),
      });
    }

    for pair in dates.windows(2) {
      if pair[1] <= pair[0] {
        return Err(Error::InvalidSeries {
          ticker,
          reason: format!("dates not strictly increasing at {}", pair[1]),
        });
      }
    }

    for (date, &close) in dates.iter().zip(closes.iter()) {
      if !close.is_finite() || close <= 0.0 {
        return Err(Error::InvalidSeries {
          ticker,
          reason: format!("non-positive close {close} at {date}"),
        });
      }
    }

    Ok(Self {
      ticker,
      dates,
      closes,
    })
  }

  pub fn ticker(&self) -> &str {
    &self.ticker
  }

  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  pub fn closes(&self) -> &[f64] {
    &self.closes
  }

  pub fn len(&self) -> usize {
    self.dates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty()
  }

  fn close_at(&self, date: NaiveDate) -> Option<f64> {
    self
      .dates
      .binary_search(&date)
      .ok()
      .map(|idx| self.closes[idx])
  }
}

/// Multiple assets inner-joined on a common date index.
///
/// Rows are dates, columns are assets in the order the series were
/// supplied. At least 2 aligned rows are required: a single observation
/// yields no return.
#[derive(Clone, Debug)]
pub struct PriceTable {
  tickers: Vec<String>,
  dates: Vec<NaiveDate>,
  closes: Array2<f64>,
}

impl PriceTable {
  /// Minimum aligned observations for a table to be constructible.
  pub const MIN_OBSERVATIONS: usize = 2;

  pub fn from_series(series: &[PriceSeries]) -> Result<Self> {
    if series.is_empty() {
      return Err(Error::DataUnavailable {
        ticker: "*".to_string(),
        reason: "no series supplied".to_string(),
      });
    }

    let mut common: Vec<NaiveDate> = series[0].dates().to_vec();
    for s in &series[1..] {
      common.retain(|date| s.dates.binary_search(date).is_ok());
    }

    if common.len() < Self::MIN_OBSERVATIONS {
      return Err(Error::InsufficientData {
        ticker: "*".to_string(),
        observations: common.len(),
        required: Self::MIN_OBSERVATIONS,
      });
    }

    let mut closes = Array2::zeros((common.len(), series.len()));
    for (col, s) in series.iter().enumerate() {
      for (row, &date) in common.iter().enumerate() {
        // present by the inner-join construction above
        let close = s.close_at(date).ok_or_else(|| Error::InvalidSeries {
          ticker: s.ticker.clone(),
          reason: format!("missing aligned close at {date}"),
        })?;
        closes[[row, col]] = close;
      }
    }

    Ok(Self {
      tickers: series.iter().map(|s| s.ticker.clone()).collect(),
      dates: common,
      closes,
    })
  }

  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Aligned close matrix, rows = dates, cols = assets.
  pub fn closes(&self) -> &Array2<f64> {
    &self.closes
  }

  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  pub fn n_observations(&self) -> usize {
    self.dates.len()
  }

  pub fn asset_closes(&self, idx: usize) -> ArrayView1<'_, f64> {
    self.closes.column(idx)
  }

  /// Last aligned close per asset.
  pub fn current_prices(&self) -> Array1<f64> {
    self.closes.row(self.dates.len() - 1).to_owned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn series(ticker: &str, days: &[u32], closes: &[f64]) -> PriceSeries {
    let dates = days.iter().map(|&day| d(2024, 1, day)).collect();
    PriceSeries::new(ticker, dates, closes.to_vec()).unwrap()
  }

  #[test]
  fn rejects_unsorted_dates() {
    let result = PriceSeries::new(
      "AAA",
      vec![d(2024, 1, 2), d(2024, 1, 1)],
      vec![100.0, 101.0],
    );
    assert!(matches!(result, Err(Error::InvalidSeries { .. })));
  }

  #[test]
  fn rejects_duplicate_dates() {
    let result = PriceSeries::new(
      "AAA",
      vec![d(2024, 1, 1), d(2024, 1, 1)],
      vec![100.0, 101.0],
    );
    assert!(matches!(result, Err(Error::InvalidSeries { .. })));
  }

  #[test]
  fn rejects_non_positive_close() {
    let result = PriceSeries::new("AAA", vec![d(2024, 1, 1)], vec![0.0]);
    assert!(matches!(result, Err(Error::InvalidSeries { .. })));
  }

  #[test]
  fn inner_join_drops_unmatched_rows() {
    let a = series("AAA", &[1, 2, 3, 4], &[100.0, 101.0, 102.0, 103.0]);
    let b = series("BBB", &[2, 3, 4, 5], &[50.0, 51.0, 52.0, 53.0]);

    let table = PriceTable::from_series(&[a, b]).unwrap();

    assert_eq!(table.n_assets(), 2);
    assert_eq!(table.n_observations(), 3);
    assert_eq!(table.dates(), &[d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)]);
    assert_eq!(table.closes()[[0, 0]], 101.0);
    assert_eq!(table.closes()[[0, 1]], 50.0);
  }

  #[test]
  fn single_aligned_observation_is_insufficient() {
    let a = series("AAA", &[1, 2], &[100.0, 101.0]);
    let b = series("BBB", &[2, 3], &[50.0, 51.0]);

    let result = PriceTable::from_series(&[a, b]);
    assert!(matches!(
      result,
      Err(Error::InsufficientData {
        observations: 1,
        ..
      })
    ));
  }

  #[test]
  fn current_prices_take_last_aligned_row() {
    let a = series("AAA", &[1, 2, 3], &[100.0, 101.0, 102.0]);
    let b = series("BBB", &[1, 2, 3], &[50.0, 51.0, 52.0]);

    let table = PriceTable::from_series(&[a, b]).unwrap();
    let last = table.current_prices();

    assert_eq!(last[0], 102.0);
    assert_eq!(last[1], 52.0);
  }
}
