//! Conversion: CoinMarketResponse → Coin (TryFrom + validation).

use super::wire;
use super::{Coin, ValidationError};
use crate::shared::CoinId;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

impl TryFrom<wire::CoinMarketResponse> for Coin {
    type Error = ValidationError;

    fn try_from(source: wire::CoinMarketResponse) -> Result<Self, Self::Error> {
        let id = CoinId::from(source.id.trim());
        if id.is_empty() {
            return Err(ValidationError::MissingId);
        }
        if source.name.trim().is_empty() {
            return Err(ValidationError::MissingName(id));
        }
        if source.symbol.trim().is_empty() {
            return Err(ValidationError::MissingSymbol(id));
        }

        let current_price = amount(&id, "current_price", source.current_price)?;
        let market_cap = amount(&id, "market_cap", source.market_cap)?;
        let total_volume = amount(&id, "total_volume", source.total_volume)?;

        Ok(Coin {
            id,
            name: source.name,
            symbol: source.symbol,
            image: source.image.unwrap_or_default(),
            current_price,
            price_change_percentage_24h: source.price_change_percentage_24h,
            market_cap,
            total_volume,
        })
    }
}

/// `None` stays `None`; a present value must fit in a `Decimal`.
fn amount(
    id: &CoinId,
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<Decimal>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) => Decimal::from_f64(v)
            .map(Some)
            .ok_or_else(|| ValidationError::OutOfRange {
                id: id.clone(),
                field,
            }),
    }
}
