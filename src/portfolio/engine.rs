//! # Allocation Engine
//!
//! $$
//! \text{fetch} \to (\mu, \Sigma) \to \mathbf{w}^\* \to
//! (\mathbb E[R_p], \sigma_p)
//! $$
//!
//! One request, one sequential pipeline run. Per-asset fetch failures
//! narrow the universe and are logged at this boundary; statistics and
//! optimization errors abort the run and propagate verbatim.

use tracing::info;
use tracing::warn;

use crate::error::Error;
use crate::error::Result;
use crate::market::provider::PriceProvider;
use crate::market::series::PriceSeries;
use crate::market::series::PriceTable;
use crate::portfolio::optimizer::evaluate;
use crate::portfolio::optimizer::optimize;
use crate::portfolio::statistics::ReturnStatistics;
use crate::portfolio::types::AllocationReport;
use crate::portfolio::types::AllocationRequest;
use crate::portfolio::types::OptimizerConfig;

/// Single entry-point engine for allocation runs. Stateless across runs:
/// it owns only solver configuration.
#[derive(Clone, Debug, Default)]
pub struct AllocationEngine {
  config: OptimizerConfig,
}

impl AllocationEngine {
  pub fn new(config: OptimizerConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &OptimizerConfig {
    &self.config
  }

  /// Run the full pipeline for one request against `provider`.
  ///
  /// A failed fetch excludes that asset only; the run fails with
  /// [`Error::DataUnavailable`] when no asset delivers a usable series.
  pub fn run(
    &self,
    provider: &dyn PriceProvider,
    request: &AllocationRequest,
  ) -> Result<AllocationReport> {
    let mut series: Vec<PriceSeries> = Vec::with_capacity(request.tickers.len());
    for ticker in &request.tickers {
      match provider.fetch(ticker, request.start, request.end) {
        Ok(fetched) => series.push(fetched),
        Err(err) => warn!(ticker = %ticker, error = %err, "excluding asset from universe"),
      }
    }

    if series.is_empty() {
      return Err(Error::DataUnavailable {
        ticker: "*".to_string(),
        reason: "no asset with usable data".to_string(),
      });
    }

    let table = PriceTable::from_series(&series)?;
    let stats = ReturnStatistics::compute(&table)?;
    let weights = optimize(&stats.mean, &stats.covariance, &self.config)?;
    let (expected_return, volatility) = evaluate(&weights, &stats.mean, &stats.covariance);

    info!(
      assets = table.n_assets(),
      observations = table.n_observations(),
      expected_return,
      volatility,
      "allocation complete"
    );

    Ok(AllocationReport {
      tickers: table.tickers().to_vec(),
      weights,
      expected_return,
      volatility,
      current_prices: table.current_prices(),
      history: table,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use tracing_test::traced_test;

  use super::*;

  struct StaticProvider {
    series: Vec<PriceSeries>,
  }

  impl PriceProvider for StaticProvider {
    fn fetch(&self, ticker: &str, _start: NaiveDate, _end: NaiveDate) -> Result<PriceSeries> {
      self
        .series
        .iter()
        .find(|s| s.ticker() == ticker)
        .cloned()
        .ok_or_else(|| Error::DataUnavailable {
          ticker: ticker.to_string(),
          reason: "unknown ticker".to_string(),
        })
    }
  }

  fn sample_series(ticker: &str, closes: &[f64]) -> PriceSeries {
    let dates = (1..=closes.len() as u32)
      .map(|day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap())
      .collect();
    PriceSeries::new(ticker, dates, closes.to_vec()).unwrap()
  }

  fn request(tickers: &[&str]) -> AllocationRequest {
    AllocationRequest {
      tickers: tickers.iter().map(|t| t.to_string()).collect(),
      start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    }
  }

  fn provider() -> StaticProvider {
    StaticProvider {
      series: vec![
        sample_series("AAA", &[100.0, 103.0, 99.5, 104.2, 101.7]),
        sample_series("BBB", &[40.0, 41.5, 42.1, 40.8, 43.0]),
      ],
    }
  }

  #[test]
  fn full_pipeline_produces_a_consistent_report() {
    let engine = AllocationEngine::default();

    let report = engine.run(&provider(), &request(&["AAA", "BBB"])).unwrap();

    assert_eq!(report.tickers, vec!["AAA", "BBB"]);
    let sum: f64 = report.weights.sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(report.volatility >= 0.0);
    assert_eq!(report.current_prices[0], 101.7);
    assert_eq!(report.current_prices[1], 43.0);
    assert_eq!(report.history.n_observations(), 5);
  }

  #[traced_test]
  #[test]
  fn failed_fetch_narrows_the_universe() {
    let engine = AllocationEngine::default();

    let report = engine.run(&provider(), &request(&["AAA", "MISSING"])).unwrap();

    assert_eq!(report.tickers, vec!["AAA"]);
    assert_eq!(report.weights[0], 1.0);
    assert!(logs_contain("excluding asset from universe"));
  }

  #[test]
  fn run_fails_only_when_no_asset_survives() {
    let engine = AllocationEngine::default();

    let result = engine.run(&provider(), &request(&["NOPE", "ALSO_NOPE"]));
    assert!(matches!(result, Err(Error::DataUnavailable { .. })));
  }

  #[test]
  fn identical_requests_yield_identical_reports() {
    let engine = AllocationEngine::default();
    let req = request(&["AAA", "BBB"]);

    let first = engine.run(&provider(), &req).unwrap();
    let second = engine.run(&provider(), &req).unwrap();

    assert_eq!(first.weights, second.weights);
    assert_eq!(first.expected_return, second.expected_return);
    assert_eq!(first.volatility, second.volatility);
  }
}
