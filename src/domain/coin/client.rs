//! Coins sub-client — the market-data coin list.

use crate::client::CoinwatchClient;
use crate::domain::coin::wire::CoinMarketResponse;
use crate::domain::coin::Coin;

/// Sub-client for the coin list.
pub struct Coins<'a> {
    pub(crate) client: &'a CoinwatchClient,
}

impl<'a> Coins<'a> {
    /// Fetch the market coin list in the client's quote currency.
    ///
    /// Never fails: transport, status and parse errors are logged and yield
    /// an empty list. Rows that fail validation are skipped.
    pub async fn list(&self) -> Vec<Coin> {
        let currency = &self.client.quote_currency;
        match self.client.http.get_coin_markets(currency).await {
            Ok(rows) => collect_valid(rows),
            Err(e) => {
                tracing::warn!(vs_currency = %currency, error = %e, "coin list request failed");
                Vec::new()
            }
        }
    }
}

fn collect_valid(rows: Vec<CoinMarketResponse>) -> Vec<Coin> {
    rows.into_iter()
        .filter_map(|row| match Coin::try_from(row) {
            Ok(coin) => Some(coin),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed coin row");
                None
            }
        })
        .collect()
}
