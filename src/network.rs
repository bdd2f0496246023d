//! Network and request defaults for the Coinwatch SDK.

/// Default market-data REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency used for prices unless configured otherwise.
pub const DEFAULT_QUOTE_CURRENCY: &str = "usd";

/// Day-count window used for price history charts when none is given.
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// Header carrying the market-data API key.
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Environment variable overriding [`DEFAULT_API_URL`].
pub const ENV_API_URL: &str = "COINWATCH_API_URL";

/// Environment variable carrying the market-data API key.
pub const ENV_API_KEY: &str = "COINWATCH_API_KEY";

/// Environment variable overriding [`DEFAULT_QUOTE_CURRENCY`].
pub const ENV_QUOTE_CURRENCY: &str = "COINWATCH_QUOTE_CURRENCY";
