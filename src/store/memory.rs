//! In-process document store with realtime fan-out.
//!
//! Deliveries happen synchronously on the writer's call stack unless
//! [`hold_deliveries`](MemoryDocumentStore::hold_deliveries) is on, in which
//! case they queue until [`flush`](MemoryDocumentStore::flush). Holding lets
//! tests reproduce slow callbacks that land after a subscription was torn
//! down.

use super::{DocumentStore, ErrorCallback, SnapshotCallback};
use crate::domain::watchlist::{WatchedCoin, WatchlistDocument};
use crate::error::StoreError;
use crate::shared::{SubscriptionHandle, UserId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

struct Observer {
    user_id: UserId,
    handle: SubscriptionHandle,
    on_snapshot: SnapshotCallback,
    on_error: ErrorCallback,
}

enum Delivery {
    Snapshot(Option<WatchlistDocument>),
    Error(StoreError),
}

#[derive(Default)]
struct Inner {
    documents: HashMap<UserId, WatchlistDocument>,
    observers: Vec<Arc<Observer>>,
    write_failure: Option<StoreError>,
    writes: HashMap<UserId, usize>,
    holding: bool,
    queued: VecDeque<(Arc<Observer>, Delivery)>,
}

impl Inner {
    fn record_write(
        &mut self,
        user_id: &UserId,
        document: WatchlistDocument,
    ) -> Vec<(Arc<Observer>, Delivery)> {
        self.documents.insert(user_id.clone(), document.clone());
        *self.writes.entry(user_id.clone()).or_default() += 1;
        self.observers_of(user_id)
            .into_iter()
            .map(|o| (o, Delivery::Snapshot(Some(document.clone()))))
            .collect()
    }

    fn observers_of(&mut self, user_id: &UserId) -> Vec<Arc<Observer>> {
        self.observers.retain(|o| o.handle.is_active());
        self.observers
            .iter()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: Mutex<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document before anything observes it.
    pub fn with_document(self, user_id: impl Into<UserId>, document: WatchlistDocument) -> Self {
        self.lock().documents.insert(user_id.into(), document);
        self
    }

    /// Reject every following write with `error` (`None` restores writes).
    pub fn fail_writes(&self, error: Option<StoreError>) {
        self.lock().write_failure = error;
    }

    /// Fail every live subscription on `user_id`'s document. Failed
    /// subscriptions are closed, as the hosted store does.
    pub fn fail_subscription(&self, user_id: &UserId, error: StoreError) {
        let pending: Vec<_> = {
            let mut inner = self.lock();
            inner
                .observers_of(user_id)
                .into_iter()
                .map(|o| (o, Delivery::Error(error.clone())))
                .collect()
        };
        self.dispatch(pending);
    }

    /// Write a document as another client would (second tab, other device).
    pub fn put_document(&self, user_id: &UserId, document: WatchlistDocument) {
        let pending = self.lock().record_write(user_id, document);
        self.dispatch(pending);
    }

    /// Queue deliveries instead of running them.
    pub fn hold_deliveries(&self, hold: bool) {
        self.lock().holding = hold;
    }

    /// Run queued deliveries in order. Deliveries for cancelled
    /// subscriptions are dropped. Returns how many callbacks ran.
    pub fn flush(&self) -> usize {
        let queued: Vec<_> = self.lock().queued.drain(..).collect();
        let mut delivered = 0;
        for (observer, delivery) in queued {
            if deliver(&observer, &delivery) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of accepted writes to `user_id`'s document.
    pub fn write_count(&self, user_id: &UserId) -> usize {
        self.lock().writes.get(user_id).copied().unwrap_or(0)
    }

    /// Number of live subscriptions on `user_id`'s document.
    pub fn observer_count(&self, user_id: &UserId) -> usize {
        self.lock().observers_of(user_id).len()
    }

    /// Current stored document, without going through a subscription.
    pub fn document(&self, user_id: &UserId) -> Option<WatchlistDocument> {
        self.lock().documents.get(user_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn dispatch(&self, pending: Vec<(Arc<Observer>, Delivery)>) {
        {
            let mut inner = self.lock();
            if inner.holding {
                inner.queued.extend(pending);
                return;
            }
        }
        for (observer, delivery) in pending {
            deliver(&observer, &delivery);
        }
    }
}

fn deliver(observer: &Observer, delivery: &Delivery) -> bool {
    if !observer.handle.is_active() {
        return false;
    }
    match delivery {
        Delivery::Snapshot(document) => (observer.on_snapshot)(document.clone()),
        Delivery::Error(error) => {
            // A failed subscription never delivers again.
            observer.handle.cancel();
            (observer.on_error)(error.clone());
        }
    }
    true
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<WatchlistDocument>, StoreError> {
        Ok(self.lock().documents.get(user_id).cloned())
    }

    fn observe(
        &self,
        user_id: &UserId,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> SubscriptionHandle {
        let handle = SubscriptionHandle::new();
        let observer = Arc::new(Observer {
            user_id: user_id.clone(),
            handle: handle.clone(),
            on_snapshot,
            on_error,
        });

        let initial = {
            let mut inner = self.lock();
            inner.observers.push(observer.clone());
            inner.documents.get(user_id).cloned()
        };
        tracing::debug!(user_id = %user_id, subscription = handle.id(), "Observing document");
        self.dispatch(vec![(observer, Delivery::Snapshot(initial))]);
        handle
    }

    async fn merge_watchlist(
        &self,
        user_id: &UserId,
        watchlist: Vec<WatchedCoin>,
    ) -> Result<(), StoreError> {
        let pending = {
            let mut inner = self.lock();
            if let Some(error) = inner.write_failure.clone() {
                tracing::debug!(user_id = %user_id, %error, "Rejecting write");
                return Err(error);
            }
            let mut document = inner.documents.get(user_id).cloned().unwrap_or_default();
            document.watchlist = watchlist;
            inner.record_write(user_id, document)
        };
        self.dispatch(pending);
        Ok(())
    }

    async fn create_document(
        &self,
        user_id: &UserId,
        document: WatchlistDocument,
    ) -> Result<bool, StoreError> {
        let pending = {
            let mut inner = self.lock();
            if let Some(error) = inner.write_failure.clone() {
                tracing::debug!(user_id = %user_id, %error, "Rejecting write");
                return Err(error);
            }
            if inner.documents.contains_key(user_id) {
                return Ok(false);
            }
            inner.record_write(user_id, document)
        };
        self.dispatch(pending);
        Ok(true)
    }
}
