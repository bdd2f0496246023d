//! HTTP client layer — `CoinwatchHttp`, one method per market-data endpoint.

pub mod client;

pub use client::CoinwatchHttp;
