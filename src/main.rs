use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDate;
use prettytable::Table;
use prettytable::row;

use markowitz_rs::portfolio::AllocationEngine;
use markowitz_rs::portfolio::AllocationRequest;
use markowitz_rs::visualization;

#[cfg(not(feature = "yahoo"))]
mod sample {
  use chrono::NaiveDate;

  use markowitz_rs::Error;
  use markowitz_rs::market::PriceProvider;
  use markowitz_rs::market::PriceSeries;

  /// Offline stand-in for the market-data provider.
  pub struct SampleProvider {
    series: Vec<PriceSeries>,
  }

  fn series(ticker: &str, closes: &[f64]) -> Result<PriceSeries, Error> {
    let dates = (0..closes.len() as u32)
      .map(|i| NaiveDate::from_ymd_opt(2020, 1, 2 + i).ok_or(Error::InvalidSeries {
        ticker: ticker.to_string(),
        reason: "date out of range".to_string(),
      }))
      .collect::<Result<Vec<NaiveDate>, Error>>()?;
    PriceSeries::new(ticker, dates, closes.to_vec())
  }

  impl SampleProvider {
    pub fn new() -> Result<Self, Error> {
      Ok(Self {
        series: vec![
          series(
            "AAPL",
            &[
              74.2, 75.1, 73.8, 76.0, 77.3, 76.8, 78.1, 79.4, 78.7, 80.2, 81.0, 80.3, 82.1, 83.0,
              82.4, 84.2,
            ],
          )?,
          series(
            "GOOG",
            &[
              68.4, 68.9, 67.7, 69.2, 70.1, 69.6, 70.8, 71.5, 70.9, 72.0, 72.8, 72.1, 73.4, 74.0,
              73.3, 74.9,
            ],
          )?,
          series(
            "MSFT",
            &[
              157.7, 159.2, 156.9, 160.4, 162.0, 161.1, 163.5, 165.2, 164.0, 166.8, 168.1, 166.9,
              169.7, 171.2, 170.0, 172.6,
            ],
          )?,
        ],
      })
    }
  }

  impl PriceProvider for SampleProvider {
    fn fetch(&self, ticker: &str, _start: NaiveDate, _end: NaiveDate) -> Result<PriceSeries, Error> {
      self
        .series
        .iter()
        .find(|s| s.ticker() == ticker)
        .cloned()
        .ok_or_else(|| Error::DataUnavailable {
          ticker: ticker.to_string(),
          reason: "not in sample data".to_string(),
        })
    }
  }
}

fn main() -> Result<()> {
  let engine = AllocationEngine::default();
  let request = AllocationRequest {
    tickers: vec!["AAPL".to_string(), "GOOG".to_string(), "MSFT".to_string()],
    start: NaiveDate::from_ymd_opt(2020, 1, 1).context("invalid start date")?,
    end: NaiveDate::from_ymd_opt(2023, 1, 1).context("invalid end date")?,
  };

  #[cfg(feature = "yahoo")]
  let provider = markowitz_rs::market::YahooProvider::new()?;
  #[cfg(not(feature = "yahoo"))]
  let provider = sample::SampleProvider::new()?;

  let report = engine.run(&provider, &request)?;

  let mut table = Table::new();
  table.add_row(row!["Ticker", "Weight", "Last close"]);
  for ((ticker, weight), price) in report
    .weight_pairs()
    .into_iter()
    .zip(report.current_prices.iter())
  {
    table.add_row(row![
      ticker,
      format!("{:.2}%", weight * 100.0),
      format!("{price:.2}")
    ]);
  }
  table.printstd();

  println!("Expected return: {:.2}%", report.expected_return * 100.0);
  println!("Volatility: {:.2}%", report.volatility * 100.0);

  visualization::weight_pie(&report, "Optimized Allocation").write_html("allocation_pie.html");
  visualization::price_history_lines(&report.history, "Price History").write_html("price_history.html");

  Ok(())
}
