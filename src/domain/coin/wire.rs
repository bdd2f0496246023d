//! Wire types for the coin-list endpoint (REST).

use serde::{Deserialize, Serialize};

/// Raw row from `GET /coins/markets`.
///
/// Numeric fields stay as plain floats here. They are frequently `null` for
/// freshly listed coins, and a value too large for `Decimal` must only
/// reject its own row during conversion, not the whole list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinMarketResponse {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_coin_market_row() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 64210.5,
            "market_cap": 1265000000000,
            "market_cap_rank": 1,
            "total_volume": 31000000000.25,
            "price_change_percentage_24h": -1.234,
            "ath": 73738
        }"#;
        let row: CoinMarketResponse = serde_json::from_str(json).unwrap();
        assert_eq!(row.id, "bitcoin");
        assert_eq!(row.current_price, Some(64210.5));
        assert_eq!(row.market_cap, Some(1_265_000_000_000.0));
        assert_eq!(row.price_change_percentage_24h, Some(-1.234));
    }

    #[test]
    fn test_deserialize_nulls_and_missing_fields() {
        let json = r#"{"id": "newcoin", "symbol": "new", "name": "New", "current_price": null}"#;
        let row: CoinMarketResponse = serde_json::from_str(json).unwrap();
        assert_eq!(row.current_price, None);
        assert_eq!(row.market_cap, None);
        assert_eq!(row.image, None);
        assert_eq!(row.price_change_percentage_24h, None);
    }

    #[test]
    fn test_huge_number_still_parses() {
        let json = r#"{"id": "scam", "symbol": "scm", "name": "Scam", "total_volume": 1e30}"#;
        let row: CoinMarketResponse = serde_json::from_str(json).unwrap();
        assert_eq!(row.total_volume, Some(1e30));
    }
}
