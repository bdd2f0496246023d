//! Watchlist domain — watched-coin snapshots, the per-user document, and the
//! sync state container driven by the realtime subscription.

pub mod state;

use crate::shared::{CoinId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{SyncState, WatchlistState};

// ─── WatchedCoin ─────────────────────────────────────────────────────────────

/// A denormalized copy of a coin taken when it was added to a watchlist.
///
/// Not a live reference: price fields go stale and are never refreshed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedCoin {
    pub id: CoinId,
    pub name: String,
    pub symbol: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub image: String,
}

// ─── WatchlistDocument ───────────────────────────────────────────────────────

/// The remote per-user document. Source of truth for a user's watchlist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WatchlistDocument {
    #[serde(default)]
    pub watchlist: Vec<WatchedCoin>,
    /// Name recorded when the document was created at sign-up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl WatchlistDocument {
    pub fn new(watchlist: Vec<WatchedCoin>) -> Self {
        Self {
            watchlist,
            name: None,
        }
    }

    /// Empty watchlist carrying the account name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            watchlist: Vec::new(),
            name: Some(name.into()),
        }
    }

    pub fn contains(&self, coin_id: &CoinId) -> bool {
        contains(&self.watchlist, coin_id)
    }

    pub fn len(&self) -> usize {
        self.watchlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchlist.is_empty()
    }

    /// Drop later entries whose id already appeared, keeping insertion order.
    ///
    /// Applied to every snapshot so a document written by another client
    /// can never surface duplicate ids.
    pub fn dedup(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.watchlist.retain(|c| seen.insert(c.id.clone()));
        self
    }
}

pub(crate) fn contains(list: &[WatchedCoin], coin_id: &CoinId) -> bool {
    list.iter().any(|c| &c.id == coin_id)
}

// ─── Mutation outcomes ───────────────────────────────────────────────────────

/// Result of `add_coin` when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The write was accepted by the store; the list updates on the next snapshot.
    Requested,
    /// The coin id is already in the observed list; nothing was written.
    AlreadyPresent,
}

/// Result of `remove_coin` when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Requested,
    /// The coin id is not in the observed list; nothing was written.
    NotPresent,
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// What the profile view shows: who is signed in and how much they watch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub user_id: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Name stored on the document, if any.
    pub document_name: Option<String>,
    pub watchlist_count: usize,
}
