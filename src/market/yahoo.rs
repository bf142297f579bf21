//! # Yahoo! Finance Provider
//!
//! Blocking [`PriceProvider`] over the Yahoo! Finance chart API, fetching
//! adjusted daily closes. Provider failures, unknown tickers and empty
//! ranges all surface as per-asset
//! [`Error::DataUnavailable`](crate::error::Error::DataUnavailable).

use chrono::DateTime;
use chrono::Datelike;
use chrono::NaiveDate;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::error::Error;
use crate::error::Result;
use crate::market::provider::PriceProvider;
use crate::market::series::PriceSeries;

/// Market-data provider backed by Yahoo! Finance.
pub struct YahooProvider {
  connector: yahoo::YahooConnector,
}

impl YahooProvider {
  pub fn new() -> Result<Self> {
    let connector = yahoo::YahooConnector::new().map_err(|err| Error::DataUnavailable {
      ticker: "*".to_string(),
      reason: err.to_string(),
    })?;
    Ok(Self { connector })
  }
}

fn utc_midnight(ticker: &str, date: NaiveDate) -> Result<OffsetDateTime> {
  let unavailable = |reason: String| Error::DataUnavailable {
    ticker: ticker.to_string(),
    reason,
  };

  let month = time::Month::try_from(date.month() as u8).map_err(|err| unavailable(err.to_string()))?;
  let day = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
    .map_err(|err| unavailable(err.to_string()))?;

  Ok(day.midnight().assume_utc())
}

impl PriceProvider for YahooProvider {
  fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
    let unavailable = |reason: String| Error::DataUnavailable {
      ticker: ticker.to_string(),
      reason,
    };

    let start_at = utc_midnight(ticker, start)?;
    let end_at = utc_midnight(ticker, end)?;

    let response = self
      .connector
      .get_quote_history(ticker, start_at, end_at)
      .map_err(|err| unavailable(err.to_string()))?;
    let quotes = response.quotes().map_err(|err| unavailable(err.to_string()))?;

    let mut dates: Vec<NaiveDate> = Vec::with_capacity(quotes.len());
    let mut closes: Vec<f64> = Vec::with_capacity(quotes.len());

    for quote in quotes {
      if !quote.adjclose.is_finite() || quote.adjclose <= 0.0 {
        continue;
      }
      let Some(stamp) = DateTime::from_timestamp(quote.timestamp as i64, 0) else {
        continue;
      };
      let date = stamp.date_naive();

      // intraday duplicates collapse to the last quote of the day
      if dates.last() == Some(&date) {
        if let Some(last) = closes.last_mut() {
          *last = quote.adjclose;
        }
        continue;
      }

      dates.push(date);
      closes.push(quote.adjclose);
    }

    if dates.is_empty() {
      return Err(unavailable("empty quote history".to_string()));
    }

    tracing::debug!(ticker, rows = dates.len(), "fetched adjusted closes");

    PriceSeries::new(ticker, dates, closes)
  }
}
