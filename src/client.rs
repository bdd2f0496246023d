//! High-level client — `CoinwatchClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder and accessor methods.

use crate::domain::coin::client::Coins;
use crate::domain::price_history::client::PriceHistoryClient;
use crate::error::SdkError;
use crate::http::CoinwatchHttp;
use crate::network;

// Re-export sub-client types for convenience.
pub use crate::domain::coin::client::Coins as CoinsClient;
pub use crate::domain::price_history::client::PriceHistoryClient as PriceHistorySubClient;

/// The market-data entry point.
///
/// Stateless apart from configuration: every call is a fresh request.
pub struct CoinwatchClient {
    pub(crate) http: CoinwatchHttp,
    pub(crate) quote_currency: String,
}

impl CoinwatchClient {
    pub fn builder() -> CoinwatchClientBuilder {
        CoinwatchClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn coins(&self) -> Coins<'_> {
        Coins { client: self }
    }

    pub fn price_history(&self) -> PriceHistoryClient<'_> {
        PriceHistoryClient { client: self }
    }

    pub fn quote_currency(&self) -> &str {
        &self.quote_currency
    }

    /// Replace the API key used for subsequent requests.
    pub async fn set_api_key(&self, api_key: Option<String>) {
        self.http.set_api_key(api_key).await;
    }
}

impl Clone for CoinwatchClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            quote_currency: self.quote_currency.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct CoinwatchClientBuilder {
    base_url: String,
    api_key: Option<String>,
    quote_currency: String,
}

impl Default for CoinwatchClientBuilder {
    fn default() -> Self {
        Self {
            base_url: network::DEFAULT_API_URL.to_string(),
            api_key: None,
            quote_currency: network::DEFAULT_QUOTE_CURRENCY.to_string(),
        }
    }
}

impl CoinwatchClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn quote_currency(mut self, currency: &str) -> Self {
        self.quote_currency = currency.trim().to_lowercase();
        self
    }

    /// Override settings from `COINWATCH_API_URL`, `COINWATCH_API_KEY` and
    /// `COINWATCH_QUOTE_CURRENCY` when they are set and non-empty.
    pub fn with_env(self) -> Self {
        self.with_lookup(|name| std::env::var(name).ok())
    }

    fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(network::ENV_API_URL) {
            self = self.base_url(&url);
        }
        if let Some(key) = get(network::ENV_API_KEY) {
            self = self.api_key(&key);
        }
        if let Some(currency) = get(network::ENV_QUOTE_CURRENCY) {
            self = self.quote_currency(&currency);
        }
        self
    }

    pub fn build(self) -> Result<CoinwatchClient, SdkError> {
        if self.quote_currency.is_empty() {
            return Err(SdkError::Validation("quote currency must not be empty".into()));
        }
        Ok(CoinwatchClient {
            http: CoinwatchHttp::new(&self.base_url, self.api_key)?,
            quote_currency: self.quote_currency,
        })
    }
}
