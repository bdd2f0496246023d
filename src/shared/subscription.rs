//! Cancellable subscription handles shared by the identity provider, the
//! document store and the watchlist sync core.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a live callback registration.
///
/// Clones share the same registration. Producers keep a clone and check
/// [`is_active`](Self::is_active) right before every delivery, so once
/// `cancel()` returns no new delivery starts for this registration.
/// Dropping a handle does not cancel it.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    id: u64,
    active: Arc<AtomicBool>,
}

impl SubscriptionHandle {
    pub fn new() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Process-unique id of this registration.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop delivery. Idempotent; returns `true` only for the call that
    /// actually cancelled.
    pub fn cancel(&self) -> bool {
        self.active.swap(false, Ordering::SeqCst)
    }
}

impl Default for SubscriptionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SubscriptionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SubscriptionHandle {}
