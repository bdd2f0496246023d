//! Coin domain — tradable coin rows from the market-data coin list.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::domain::watchlist::WatchedCoin;
use crate::shared::CoinId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ─── Coin ────────────────────────────────────────────────────────────────────

/// A validated row of the market-data coin list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: CoinId,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub current_price: Option<Decimal>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap: Option<Decimal>,
    pub total_volume: Option<Decimal>,
}

impl Coin {
    /// 24h direction used for colouring rows. A missing change counts as flat (up).
    pub fn is_price_up(&self) -> bool {
        self.price_change_percentage_24h.unwrap_or(0.0) >= 0.0
    }

    /// Ticker in display case (`"btc"` → `"BTC"`).
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    /// Snapshot this row into a watchlist entry.
    pub fn to_watched(&self) -> WatchedCoin {
        WatchedCoin {
            id: self.id.clone(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            current_price: self.current_price,
            price_change_percentage_24h: self.price_change_percentage_24h,
            image: self.image.clone(),
        }
    }
}

// ─── Movers ──────────────────────────────────────────────────────────────────

/// The `n` coins with the largest 24h gain, biggest first.
///
/// Coins without a 24h change sort after every coin that has one. Ties keep
/// the input order.
pub fn top_movers(coins: &[Coin], n: usize) -> Vec<Coin> {
    let mut ranked: Vec<&Coin> = coins.iter().collect();
    ranked.sort_by(|a, b| {
        match (a.price_change_percentage_24h, b.price_change_percentage_24h) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    ranked.into_iter().take(n).cloned().collect()
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingId,
    MissingName(CoinId),
    MissingSymbol(CoinId),
    /// A numeric field does not fit in a `Decimal`.
    OutOfRange { id: CoinId, field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingId => write!(f, "Missing coin id"),
            ValidationError::MissingName(id) => write!(f, "Missing name for {}", id),
            ValidationError::MissingSymbol(id) => write!(f, "Missing symbol for {}", id),
            ValidationError::OutOfRange { id, field } => {
                write!(f, "{} out of range for {}", field, id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn coin(change: Option<f64>) -> Coin {
        Coin {
            id: CoinId::from("bitcoin"),
            name: "Bitcoin".to_string(),
            symbol: "btc".to_string(),
            image: "https://img/btc.png".to_string(),
            current_price: Some(Decimal::from_str("64210.5").unwrap()),
            price_change_percentage_24h: change,
            market_cap: None,
            total_volume: None,
        }
    }

    #[test]
    fn test_is_price_up() {
        assert!(coin(Some(1.2)).is_price_up());
        assert!(coin(Some(0.0)).is_price_up());
        assert!(coin(None).is_price_up());
        assert!(!coin(Some(-0.01)).is_price_up());
    }

    fn mover(id: &str, change: Option<f64>) -> Coin {
        Coin {
            id: CoinId::from(id),
            ..coin(change)
        }
    }

    #[test]
    fn test_top_movers_orders_by_gain() {
        let coins = vec![
            mover("flat", Some(0.0)),
            mover("unknown", None),
            mover("rocket", Some(12.5)),
            mover("dump", Some(-8.0)),
            mover("climber", Some(3.1)),
        ];
        let ids: Vec<String> = top_movers(&coins, 4)
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["rocket", "climber", "flat", "dump"]);
    }

    #[test]
    fn test_top_movers_short_input() {
        let coins = vec![mover("unknown", None), mover("up", Some(1.0))];
        let ids: Vec<String> = top_movers(&coins, 4)
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["up", "unknown"]);
        assert!(top_movers(&[], 4).is_empty());
    }

    #[test]
    fn test_to_watched_copies_snapshot_fields() {
        let c = coin(Some(-2.5));
        let watched = c.to_watched();
        assert_eq!(watched.id, c.id);
        assert_eq!(watched.symbol, "btc");
        assert_eq!(watched.current_price, c.current_price);
        assert_eq!(watched.price_change_percentage_24h, Some(-2.5));
        assert_eq!(c.display_symbol(), "BTC");
    }
}
