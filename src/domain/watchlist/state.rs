//! Watchlist sync state container — app-owned, SDK-provided transition logic.
//!
//! Holds no I/O. [`crate::sync::WatchlistSync`] drives it from identity
//! changes and subscription callbacks; every subscription is tagged with the
//! generation that opened it, and deliveries for any other generation are
//! rejected.

use super::{WatchedCoin, WatchlistDocument};
use crate::auth::Identity;
use crate::shared::UserId;

/// Lifecycle of the observed watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No identity. The list is empty and no subscription is open.
    #[default]
    Unauthenticated,
    /// A subscription is open but has not delivered yet.
    Syncing,
    /// At least one snapshot has been applied.
    Live,
    /// The subscription failed. The list is frozen at its last value.
    Error,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Unauthenticated => "unauthenticated",
            SyncState::Syncing => "syncing",
            SyncState::Live => "live",
            SyncState::Error => "error",
        }
    }

    /// Whether an identity is present in this state.
    pub fn is_signed_in(&self) -> bool {
        !matches!(self, SyncState::Unauthenticated)
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the owner must do with its subscription after an identity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityTransition {
    /// Same identity, healthy subscription. Keep it.
    Unchanged,
    /// Identity lost. Tear down the current subscription.
    SignedOut,
    /// Tear down the current subscription (if any) and open one for `user_id`,
    /// tagging its callbacks with `generation`.
    Subscribe { user_id: UserId, generation: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct WatchlistState {
    state: SyncState,
    identity: Option<Identity>,
    list: Vec<WatchedCoin>,
    generation: u64,
    last_error: Option<String>,
}

impl WatchlistState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn list(&self) -> &[WatchedCoin] {
        &self.list
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Apply an identity change from the identity provider.
    pub fn set_identity(&mut self, identity: Option<Identity>) -> IdentityTransition {
        match identity {
            None => {
                if self.identity.is_none() && self.state == SyncState::Unauthenticated {
                    return IdentityTransition::Unchanged;
                }
                self.identity = None;
                self.list.clear();
                self.state = SyncState::Unauthenticated;
                self.last_error = None;
                self.generation += 1;
                IdentityTransition::SignedOut
            }
            Some(next) => {
                let same_user = self
                    .identity
                    .as_ref()
                    .is_some_and(|current| current.user_id == next.user_id);

                if same_user && self.state != SyncState::Error {
                    // Profile fields may have changed; the document key has not.
                    self.identity = Some(next);
                    return IdentityTransition::Unchanged;
                }

                if !same_user {
                    // Never show the previous user's list to the next one.
                    self.list.clear();
                }

                let user_id = next.user_id.clone();
                self.identity = Some(next);
                self.state = SyncState::Syncing;
                self.last_error = None;
                self.generation += 1;
                IdentityTransition::Subscribe {
                    user_id,
                    generation: self.generation,
                }
            }
        }
    }

    /// Apply a subscription snapshot. `None` means the document does not exist.
    ///
    /// Returns `false` (and changes nothing) when the snapshot belongs to a
    /// torn-down subscription.
    pub fn apply_snapshot(&mut self, generation: u64, document: Option<WatchlistDocument>) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.list = document
            .map(|doc| doc.dedup().watchlist)
            .unwrap_or_default();
        self.state = SyncState::Live;
        self.last_error = None;
        true
    }

    /// Apply a subscription error. The list is left untouched.
    pub fn apply_error(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.state = SyncState::Error;
        self.last_error = Some(message.into());
        true
    }

    fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.identity.is_some()
    }
}
