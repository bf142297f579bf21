//! # Visualization
//!
//! $$
//! \mathbf{w} \mapsto \text{weight pie},\qquad p_{t,i} \mapsto \text{price lines}
//! $$
//!
//! Plotly renderings of a finished [`AllocationReport`]: a pie chart of
//! the optimized weights and a line chart of the aligned price history.
//! Rendering sits outside the pipeline; these helpers only translate.

use ndarray::Array1;
use plotly::Layout;
use plotly::Pie;
use plotly::Plot;
use plotly::Scatter;
use plotly::common::Mode;

use crate::market::series::PriceTable;
use crate::portfolio::types::AllocationReport;

/// Pie chart of the optimized weights, one slice per asset.
pub fn weight_pie(report: &AllocationReport, title: &str) -> Plot {
  let trace = Pie::new(report.weights.to_vec()).labels(report.tickers.clone());

  let mut plot = Plot::new();
  plot.add_trace(trace);
  plot.set_layout(Layout::new().title(title));
  plot
}

/// One line per asset over the aligned date index.
pub fn price_history_lines(table: &PriceTable, title: &str) -> Plot {
  let dates: Array1<String> = table.dates().iter().map(|d| d.to_string()).collect();

  let mut plot = Plot::new();
  for (idx, ticker) in table.tickers().iter().enumerate() {
    let trace = Scatter::from_array(dates.clone(), table.asset_closes(idx).to_owned())
      .name(ticker)
      .mode(Mode::Lines);
    plot.add_trace(trace);
  }
  plot.set_layout(Layout::new().title(title));
  plot
}
