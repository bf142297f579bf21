//! # Market
//!
//! $$
//! \text{provider} \to \{(t_k, p_k)\}_{k=1}^{T} \to \text{aligned close table}
//! $$
//!
//! Market-data layer: validated price series, inner-join alignment and the
//! provider contract the allocation engine consumes.

pub mod provider;
pub mod series;
#[cfg(feature = "yahoo")]
pub mod yahoo;

pub use provider::PriceProvider;
pub use series::PriceSeries;
pub use series::PriceTable;
#[cfg(feature = "yahoo")]
pub use yahoo::YahooProvider;
