//! Low-level HTTP client — `CoinwatchHttp`.
//!
//! One method per market-data endpoint. Returns wire types (conversion to
//! domain types happens at the sub-client boundary) and propagates every
//! failure; the fail-soft policy lives in the sub-clients.

use crate::domain::coin::wire::CoinMarketResponse;
use crate::domain::price_history::wire::MarketChartResponse;
use crate::error::HttpError;
use crate::network::API_KEY_HEADER;

use async_lock::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// Low-level HTTP client for the market-data REST API.
pub struct CoinwatchHttp {
    base_url: String,
    client: Client,
    /// API key sent with every request when set. Never exposed publicly.
    api_key: Arc<RwLock<Option<String>>>,
}

impl CoinwatchHttp {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            api_key: Arc::new(RwLock::new(api_key)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the API key used for subsequent requests.
    pub async fn set_api_key(&self, api_key: Option<String>) {
        *self.api_key.write().await = api_key;
    }

    // ── Coins ────────────────────────────────────────────────────────────

    pub async fn get_coin_markets(
        &self,
        vs_currency: &str,
    ) -> Result<Vec<CoinMarketResponse>, HttpError> {
        let url = format!(
            "{}/coins/markets?vs_currency={}",
            self.base_url,
            urlencoding::encode(vs_currency)
        );
        self.get(&url).await
    }

    // ── Price History ────────────────────────────────────────────────────

    pub async fn get_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<MarketChartResponse, HttpError> {
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}",
            self.base_url,
            urlencoding::encode(coin_id),
            urlencoding::encode(vs_currency),
            days
        );
        self.get(&url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        tracing::debug!("GET {}", url);
        let mut req = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(key) = self.api_key.read().await.as_ref() {
            req = req.header(API_KEY_HEADER, key);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 | 403 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl Clone for CoinwatchHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let http = CoinwatchHttp::new("https://api.example.com/v3/", None).unwrap();
        assert_eq!(http.base_url(), "https://api.example.com/v3");
    }
}
