//! Price history sub-client — daily chart series.

use crate::client::CoinwatchClient;
use crate::domain::price_history::{resample_daily, PricePoint};
use crate::network::DEFAULT_HISTORY_DAYS;
use crate::shared::CoinId;

/// Sub-client for historical price series.
pub struct PriceHistoryClient<'a> {
    pub(crate) client: &'a CoinwatchClient,
}

impl<'a> PriceHistoryClient<'a> {
    /// Daily closing prices for `coin_id` over the last `days` days,
    /// one point per UTC calendar day, oldest first.
    ///
    /// Never fails: errors are logged and yield an empty series.
    pub async fn daily(&self, coin_id: &CoinId, days: u32) -> Vec<PricePoint> {
        if coin_id.is_empty() {
            tracing::warn!("price history requested for an empty coin id");
            return Vec::new();
        }
        let currency = &self.client.quote_currency;
        match self
            .client
            .http
            .get_market_chart(coin_id.as_str(), currency, days)
            .await
        {
            Ok(chart) => {
                let points = resample_daily(&chart.prices);
                tracing::debug!(
                    coin_id = %coin_id,
                    samples = chart.prices.len(),
                    points = points.len(),
                    "resampled price history"
                );
                points
            }
            Err(e) => {
                tracing::warn!(coin_id = %coin_id, days, error = %e, "price history request failed");
                Vec::new()
            }
        }
    }

    /// [`daily`](Self::daily) over the default chart window.
    pub async fn recent(&self, coin_id: &CoinId) -> Vec<PricePoint> {
        self.daily(coin_id, DEFAULT_HISTORY_DAYS).await
    }
}
