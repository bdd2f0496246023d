//! Price history domain — daily chart points for a coin.

#[cfg(feature = "http")]
pub mod client;
pub mod resample;
pub mod wire;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use resample::resample_daily;

/// One point on a price chart: the last observed price of a calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub day: NaiveDate,
    /// Short axis label, e.g. `"Jan 5"`.
    pub label: String,
    pub price: Decimal,
}
