//! # Coinwatch SDK
//!
//! Client-side core for a cryptocurrency market tracker: market data from a
//! CoinGecko-compatible REST API, and a per-user watchlist kept live against
//! a hosted document store.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Newtypes, domain models, routes (always available, no I/O)
//! 2. **Identity** — `IdentityProvider` trait + in-memory provider
//! 3. **Store** — `DocumentStore` trait + in-memory store with realtime fan-out
//! 4. **Sync** — `WatchlistSync`, write-then-observe watchlist core
//! 5. **HTTP API** — `CoinwatchClient` with fail-soft market-data sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coinwatch_sdk::prelude::*;
//! use std::sync::Arc;
//!
//! let client = CoinwatchClient::builder().with_env().build()?;
//! let coins = client.coins().list().await;
//!
//! let sync = WatchlistSync::new(Arc::new(MemoryDocumentStore::new()), None);
//! let _binding = sync.bind_identity_provider(&provider);
//! sync.add_coin(coins[0].to_watched()).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and the subscription handle.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// API URL, header and environment constants.
pub mod network;

/// Page route table.
pub mod routes;

// ── Layer 2: Identity ────────────────────────────────────────────────────────

/// Identity provider binding: sign-in, sign-up, sign-out, change events.
pub mod auth;

// ── Layer 3: Store ───────────────────────────────────────────────────────────

/// Per-user watchlist documents with live subscriptions.
pub mod store;

// ── Layer 4: Sync ────────────────────────────────────────────────────────────

/// Watchlist synchronization core.
pub mod sync;

// ── Layer 5: HTTP API ────────────────────────────────────────────────────────

/// Low-level market-data HTTP client.
#[cfg(feature = "http")]
pub mod http;

/// `CoinwatchClient` — the market-data entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{CoinId, SubscriptionHandle, UserId};

    // Domain types
    pub use crate::domain::coin::{top_movers, Coin};
    pub use crate::domain::price_history::PricePoint;
    pub use crate::domain::watchlist::{
        AddOutcome, ProfileSummary, RemoveOutcome, SyncState, WatchedCoin, WatchlistDocument,
    };

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError, StoreError, WatchlistError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_HISTORY_DAYS, DEFAULT_QUOTE_CURRENCY};

    // Routes
    pub use crate::routes::Route;

    // Identity
    pub use crate::auth::memory::MemoryIdentityProvider;
    pub use crate::auth::{FederatedProvider, Identity, IdentityProvider};

    // Store
    pub use crate::store::memory::MemoryDocumentStore;
    pub use crate::store::{document_name, ensure_document, profile_summary, DocumentStore};

    // Sync
    pub use crate::sync::{WatchlistSync, WatchlistView};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        CoinsClient, CoinwatchClient, CoinwatchClientBuilder, PriceHistorySubClient,
    };
}
