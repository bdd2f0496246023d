//! Wire types for the historical chart endpoint (REST).

use serde::{Deserialize, Serialize};

/// Response of `GET /coins/{id}/market_chart`.
///
/// A list of `[timestamp_ms, price]` pairs. The market-cap and volume
/// series the endpoint also returns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChartResponse {
    #[serde(default)]
    pub prices: Vec<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_market_chart_ignores_other_series() {
        let json = r#"{
            "prices": [[1704067200000, 42280.23], [1704070800000, 42310.5]],
            "market_caps": [[1704067200000, 827000000000.0]]
        }"#;
        let resp: MarketChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.prices.len(), 2);
        assert_eq!(resp.prices[0], (1704067200000.0, 42280.23));
    }
}
