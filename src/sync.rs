//! Watchlist sync core — `WatchlistSync`.
//!
//! Keeps a locally observable watchlist for the signed-in identity, mirrored
//! from that identity's remote document through a live subscription.
//!
//! Mutations are write-then-observe: `add_coin` / `remove_coin` compute the
//! next full sequence from the observed list and write it to the store. The
//! local list is never edited directly; it changes only when the
//! subscription delivers the resulting snapshot.
//!
//! Identity changes arrive explicitly through [`WatchlistSync::on_identity_changed`]
//! (or a provider binding). Each one tears down the current subscription,
//! and every subscription's callbacks carry the generation that opened it,
//! so late deliveries from a torn-down subscription are discarded even if
//! the store fails to suppress them.

use crate::auth::{Identity, IdentityProvider};
use crate::domain::watchlist::state::IdentityTransition;
use crate::domain::watchlist::{
    self, AddOutcome, RemoveOutcome, SyncState, WatchedCoin, WatchlistState,
};
use crate::error::WatchlistError;
use crate::shared::{CoinId, SubscriptionHandle};
use crate::store::{DocumentStore, ErrorCallback, SnapshotCallback};

use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// What listeners see after every accepted change.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistView {
    pub state: SyncState,
    pub coins: Vec<WatchedCoin>,
}

impl WatchlistView {
    /// Waiting for the first snapshot of the current identity.
    pub fn is_loading(&self) -> bool {
        self.state == SyncState::Syncing
    }
}

/// Callback invoked with the current view on registration and after every change.
pub type ViewListener = Arc<dyn Fn(&WatchlistView) + Send + Sync>;

#[derive(Default)]
struct Inner {
    state: WatchlistState,
    subscription: Option<SubscriptionHandle>,
    listeners: Vec<(SubscriptionHandle, ViewListener)>,
}

impl Inner {
    fn view(&self) -> WatchlistView {
        WatchlistView {
            state: self.state.state(),
            coins: self.state.list().to_vec(),
        }
    }

    /// Listeners to notify plus the view to send them, taken under the lock.
    fn pending_notification(&mut self) -> (Vec<ViewListener>, WatchlistView) {
        self.listeners.retain(|(handle, _)| handle.is_active());
        let listeners = self
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        (listeners, self.view())
    }
}

/// The watchlist synchronization core.
///
/// Cheap to clone; clones share state.
pub struct WatchlistSync<S: DocumentStore> {
    store: Arc<S>,
    inner: Arc<Mutex<Inner>>,
}

impl<S: DocumentStore + 'static> WatchlistSync<S> {
    /// Create the core and apply `identity` as the first identity change.
    pub fn new(store: Arc<S>, identity: Option<Identity>) -> Self {
        let sync = Self {
            store,
            inner: Arc::new(Mutex::new(Inner::default())),
        };
        sync.on_identity_changed(identity);
        sync
    }

    /// Drive identity changes from `provider`. The returned handle stops
    /// forwarding when cancelled.
    pub fn bind_identity_provider<P: IdentityProvider>(&self, provider: &P) -> SubscriptionHandle {
        let this = self.clone();
        provider.on_identity_changed(Arc::new(move |identity| {
            this.on_identity_changed(identity);
        }))
    }

    /// Apply an identity change: tear down the current subscription and, when
    /// a new identity is present, open a subscription to its document.
    pub fn on_identity_changed(&self, identity: Option<Identity>) {
        let (transition, previous) = {
            let mut inner = self.lock();
            let transition = inner.state.set_identity(identity);
            let previous = match transition {
                IdentityTransition::Unchanged => None,
                _ => inner.subscription.take(),
            };
            (transition, previous)
        };

        if let Some(handle) = previous {
            handle.cancel();
            tracing::debug!(subscription = handle.id(), "Closed watchlist subscription");
        }

        match transition {
            IdentityTransition::Unchanged => {}
            IdentityTransition::SignedOut => {
                tracing::info!("Identity cleared, watchlist reset");
                self.notify();
            }
            IdentityTransition::Subscribe {
                user_id,
                generation,
            } => {
                tracing::info!(user_id = %user_id, generation, "Syncing watchlist");
                self.notify();

                let weak = Arc::downgrade(&self.inner);
                let handle = self.store.observe(
                    &user_id,
                    snapshot_callback(weak.clone(), generation),
                    error_callback(weak, generation),
                );

                let mut inner = self.lock();
                if inner.state.generation() == generation {
                    inner.subscription = Some(handle);
                } else {
                    // Superseded while opening.
                    drop(inner);
                    handle.cancel();
                }
            }
        }
    }

    /// Request that `coin` be appended to the watchlist.
    ///
    /// Returns [`AddOutcome::AlreadyPresent`] without writing when the
    /// observed list already holds the coin id. On success the observed
    /// list is unchanged until the store delivers the new snapshot.
    pub async fn add_coin(&self, coin: WatchedCoin) -> Result<AddOutcome, WatchlistError> {
        let (user_id, next) = {
            let inner = self.lock();
            let identity = inner
                .state
                .identity()
                .ok_or(WatchlistError::NotAuthenticated)?;
            let current = inner.state.list();
            if watchlist::contains(current, &coin.id) {
                tracing::debug!(coin_id = %coin.id, "Coin already on watchlist");
                return Ok(AddOutcome::AlreadyPresent);
            }
            let mut next = current.to_vec();
            next.push(coin);
            (identity.user_id.clone(), next)
        };

        tracing::debug!(user_id = %user_id, len = next.len(), "Writing watchlist (add)");
        self.store
            .merge_watchlist(&user_id, next)
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id = %user_id, "Watchlist add rejected: {}", e)
            })?;
        Ok(AddOutcome::Requested)
    }

    /// Request that every entry with `coin_id` be removed from the watchlist.
    ///
    /// No write is issued when the observed list does not hold the coin id.
    pub async fn remove_coin(&self, coin_id: &CoinId) -> Result<RemoveOutcome, WatchlistError> {
        let (user_id, next) = {
            let inner = self.lock();
            let identity = inner
                .state
                .identity()
                .ok_or(WatchlistError::NotAuthenticated)?;
            let current = inner.state.list();
            if !watchlist::contains(current, coin_id) {
                return Ok(RemoveOutcome::NotPresent);
            }
            let next: Vec<WatchedCoin> = current
                .iter()
                .filter(|c| &c.id != coin_id)
                .cloned()
                .collect();
            (identity.user_id.clone(), next)
        };

        tracing::debug!(user_id = %user_id, len = next.len(), "Writing watchlist (remove)");
        self.store
            .merge_watchlist(&user_id, next)
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id = %user_id, "Watchlist remove rejected: {}", e)
            })?;
        Ok(RemoveOutcome::Requested)
    }

    /// Register for view changes. The listener is called right away with the
    /// current view.
    pub fn listen(&self, listener: ViewListener) -> SubscriptionHandle {
        let handle = SubscriptionHandle::new();
        let view = {
            let mut inner = self.lock();
            inner.listeners.push((handle.clone(), listener.clone()));
            inner.view()
        };
        listener(&view);
        handle
    }

    fn notify(&self) {
        let (listeners, view) = self.lock().pending_notification();
        for listener in listeners {
            listener(&view);
        }
    }
}

impl<S: DocumentStore> WatchlistSync<S> {
    /// The most recent observed watchlist. Never blocks on I/O.
    pub fn current_list(&self) -> Vec<WatchedCoin> {
        self.lock().state.list().to_vec()
    }

    pub fn state(&self) -> SyncState {
        self.lock().state.state()
    }

    pub fn view(&self) -> WatchlistView {
        self.lock().view()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.lock().state.identity().cloned()
    }

    /// Message of the subscription error that moved the core to `Error`.
    pub fn last_error(&self) -> Option<String> {
        self.lock().state.last_error().map(str::to_string)
    }

    /// Whether a remote subscription is currently held open.
    pub fn is_subscribed(&self) -> bool {
        self.lock()
            .subscription
            .as_ref()
            .is_some_and(SubscriptionHandle::is_active)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }
}

impl<S: DocumentStore> Clone for WatchlistSync<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            inner: self.inner.clone(),
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

fn snapshot_callback(inner: Weak<Mutex<Inner>>, generation: u64) -> SnapshotCallback {
    Arc::new(move |document| {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let (listeners, view) = {
            let mut guard = lock(&inner);
            if !guard.state.apply_snapshot(generation, document) {
                tracing::debug!(
                    generation,
                    current = guard.state.generation(),
                    "Discarding snapshot from closed subscription"
                );
                return;
            }
            guard.pending_notification()
        };
        tracing::debug!(generation, len = view.coins.len(), "Watchlist snapshot applied");
        for listener in listeners {
            listener(&view);
        }
    })
}

fn error_callback(inner: Weak<Mutex<Inner>>, generation: u64) -> ErrorCallback {
    Arc::new(move |error| {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let (listeners, view) = {
            let mut guard = lock(&inner);
            if !guard.state.apply_error(generation, error.to_string()) {
                tracing::debug!(generation, "Discarding error from closed subscription");
                return;
            }
            guard.pending_notification()
        };
        tracing::warn!(generation, "Watchlist subscription failed: {}", error);
        for listener in listeners {
            listener(&view);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::watchlist::WatchlistDocument;
    use crate::error::StoreError;
    use crate::shared::UserId;

    /// A store that never suppresses delivery: tests fire callbacks by hand,
    /// including after the core cancelled the subscription.
    #[derive(Default)]
    struct LeakyStore {
        opened: Mutex<Vec<(UserId, SnapshotCallback, ErrorCallback, SubscriptionHandle)>>,
        writes: Mutex<Vec<(UserId, Vec<CoinId>)>>,
    }

    impl LeakyStore {
        fn opened(&self, index: usize) -> (UserId, SnapshotCallback, ErrorCallback, SubscriptionHandle) {
            self.opened.lock().unwrap()[index].clone()
        }

        fn open_count(&self) -> usize {
            self.opened.lock().unwrap().len()
        }
    }

    impl DocumentStore for LeakyStore {
        async fn get(&self, _user_id: &UserId) -> Result<Option<WatchlistDocument>, StoreError> {
            Ok(None)
        }

        fn observe(
            &self,
            user_id: &UserId,
            on_snapshot: SnapshotCallback,
            on_error: ErrorCallback,
        ) -> SubscriptionHandle {
            let handle = SubscriptionHandle::new();
            self.opened
                .lock()
                .unwrap()
                .push((user_id.clone(), on_snapshot, on_error, handle.clone()));
            handle
        }

        async fn merge_watchlist(
            &self,
            user_id: &UserId,
            watchlist: Vec<WatchedCoin>,
        ) -> Result<(), StoreError> {
            self.writes.lock().unwrap().push((
                user_id.clone(),
                watchlist.into_iter().map(|c| c.id).collect(),
            ));
            Ok(())
        }

        async fn create_document(
            &self,
            _user_id: &UserId,
            _document: WatchlistDocument,
        ) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    fn watched(id: &str) -> WatchedCoin {
        WatchedCoin {
            id: CoinId::from(id),
            name: id.to_string(),
            symbol: id.to_string(),
            current_price: None,
            price_change_percentage_24h: None,
            image: String::new(),
        }
    }

    fn doc(ids: &[&str]) -> Option<WatchlistDocument> {
        Some(WatchlistDocument::new(ids.iter().map(|id| watched(id)).collect()))
    }

    fn ids(list: &[WatchedCoin]) -> Vec<&str> {
        list.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_starts_unauthenticated_without_subscription() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), None);
        assert_eq!(sync.state(), SyncState::Unauthenticated);
        assert!(sync.current_list().is_empty());
        assert_eq!(store.open_count(), 0);
    }

    #[test]
    fn test_initial_identity_opens_subscription() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), Some(Identity::new("u1")));
        assert_eq!(sync.state(), SyncState::Syncing);
        assert!(sync.is_subscribed());
        assert_eq!(store.opened(0).0, UserId::from("u1"));
    }

    #[test]
    fn test_late_snapshot_after_switch_is_discarded() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), Some(Identity::new("alice")));
        sync.on_identity_changed(Some(Identity::new("bob")));

        let (_, alice_snapshot, _, alice_handle) = store.opened(0);
        assert!(!alice_handle.is_active());

        alice_snapshot(doc(&["bitcoin"]));
        assert!(sync.current_list().is_empty());
        assert_eq!(sync.state(), SyncState::Syncing);

        let (_, bob_snapshot, _, _) = store.opened(1);
        bob_snapshot(doc(&["ethereum"]));
        assert_eq!(ids(&sync.current_list()), vec!["ethereum"]);
    }

    #[test]
    fn test_late_snapshot_after_sign_out_is_discarded() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), Some(Identity::new("alice")));
        let (_, snapshot, on_error, _) = store.opened(0);
        snapshot(doc(&["bitcoin"]));
        assert_eq!(sync.current_list().len(), 1);

        sync.on_identity_changed(None);
        assert!(sync.current_list().is_empty());
        assert!(!sync.is_subscribed());

        snapshot(doc(&["bitcoin", "solana"]));
        on_error(StoreError::Subscription("late".into()));
        assert!(sync.current_list().is_empty());
        assert_eq!(sync.state(), SyncState::Unauthenticated);
    }

    #[test]
    fn test_error_freezes_and_same_identity_resubscribes() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), Some(Identity::new("u1")));
        let (_, snapshot, on_error, _) = store.opened(0);
        snapshot(doc(&["bitcoin"]));

        on_error(StoreError::Subscription("offline".into()));
        assert_eq!(sync.state(), SyncState::Error);
        assert_eq!(ids(&sync.current_list()), vec!["bitcoin"]);
        assert!(sync.last_error().unwrap().contains("offline"));

        sync.on_identity_changed(Some(Identity::new("u1")));
        assert_eq!(sync.state(), SyncState::Syncing);
        assert_eq!(store.open_count(), 2);
        assert_eq!(ids(&sync.current_list()), vec!["bitcoin"]);
    }

    #[test]
    fn test_add_does_not_touch_local_list() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), Some(Identity::new("u1")));
        let (_, snapshot, _, _) = store.opened(0);
        snapshot(None);

        let outcome = tokio_test::block_on(sync.add_coin(watched("bitcoin"))).unwrap();
        assert_eq!(outcome, AddOutcome::Requested);
        assert!(sync.current_list().is_empty());
        assert_eq!(
            *store.writes.lock().unwrap(),
            vec![(UserId::from("u1"), vec![CoinId::from("bitcoin")])]
        );
    }

    #[test]
    fn test_mutations_require_identity() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), None);
        assert_eq!(
            tokio_test::block_on(sync.add_coin(watched("bitcoin"))),
            Err(WatchlistError::NotAuthenticated)
        );
        assert_eq!(
            tokio_test::block_on(sync.remove_coin(&CoinId::from("bitcoin"))),
            Err(WatchlistError::NotAuthenticated)
        );
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_add_while_syncing_still_writes() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), Some(Identity::new("u1")));
        assert_eq!(sync.state(), SyncState::Syncing);

        tokio_test::block_on(sync.add_coin(watched("bitcoin"))).unwrap();
        assert_eq!(store.writes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_listeners_see_every_accepted_change() {
        let store = Arc::new(LeakyStore::default());
        let sync = WatchlistSync::new(store.clone(), None);
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = states.clone();
        let handle = sync.listen(Arc::new(move |view: &WatchlistView| {
            sink.lock().unwrap().push((view.state, view.coins.len()));
        }));

        sync.on_identity_changed(Some(Identity::new("u1")));
        let (_, snapshot, _, _) = store.opened(0);
        snapshot(doc(&["bitcoin", "solana"]));
        sync.on_identity_changed(None);
        // Stale, ignored.
        snapshot(doc(&["bitcoin"]));

        assert_eq!(
            *states.lock().unwrap(),
            vec![
                (SyncState::Unauthenticated, 0),
                (SyncState::Syncing, 0),
                (SyncState::Live, 2),
                (SyncState::Unauthenticated, 0),
            ]
        );

        handle.cancel();
        sync.on_identity_changed(Some(Identity::new("u2")));
        assert_eq!(states.lock().unwrap().len(), 4);
    }
}
