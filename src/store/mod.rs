//! Document store binding — the per-user watchlist documents.
//!
//! The hosted document database is an external collaborator. Each identity
//! owns at most one [`WatchlistDocument`], keyed by its [`UserId`]. The
//! store is read once (profile view), observed through a live subscription
//! (watchlist sync), and written with a merge-upsert that carries the full
//! watchlist sequence.
//!
//! [`memory::MemoryDocumentStore`] is an in-process implementation with
//! realtime fan-out and fault injection, used by tests and local development.

pub mod memory;

use crate::auth::Identity;
use crate::domain::watchlist::{ProfileSummary, WatchedCoin, WatchlistDocument};
use crate::error::StoreError;
use crate::shared::{SubscriptionHandle, UserId};
use std::future::Future;
use std::sync::Arc;

/// Called with every snapshot of an observed document. `None` means the
/// document does not exist.
pub type SnapshotCallback = Arc<dyn Fn(Option<WatchlistDocument>) + Send + Sync>;

/// Called when an observed subscription fails. No snapshot follows an error.
pub type ErrorCallback = Arc<dyn Fn(StoreError) + Send + Sync>;

pub trait DocumentStore: Send + Sync {
    /// One-shot read.
    fn get(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<WatchlistDocument>, StoreError>> + Send;

    /// Open a live subscription to `user_id`'s document.
    ///
    /// The current state is delivered first, then one snapshot per accepted
    /// write. Cancelling the returned handle suppresses every later delivery.
    fn observe(
        &self,
        user_id: &UserId,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> SubscriptionHandle;

    /// Merge-upsert the full watchlist onto `user_id`'s document, creating
    /// the document when absent. Other document fields are kept.
    fn merge_watchlist(
        &self,
        user_id: &UserId,
        watchlist: Vec<WatchedCoin>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Write `document` only if `user_id` has none yet. Returns whether it
    /// was written.
    fn create_document(
        &self,
        user_id: &UserId,
        document: WatchlistDocument,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Name stored on a new document: display name, else email, else empty.
pub fn document_name(identity: &Identity) -> String {
    identity
        .display_name
        .as_deref()
        .or(identity.email.as_deref())
        .unwrap_or_default()
        .to_string()
}

/// Create `identity`'s document with an empty watchlist and its
/// [`document_name`] if it does not exist. Returns whether it was created.
///
/// Run after sign-up so the profile view has a document to read.
pub async fn ensure_document<S: DocumentStore>(
    store: &S,
    identity: &Identity,
) -> Result<bool, StoreError> {
    let created = store
        .create_document(
            &identity.user_id,
            WatchlistDocument::named(document_name(identity)),
        )
        .await?;
    if created {
        tracing::debug!(user_id = %identity.user_id, "Created watchlist document");
    }
    Ok(created)
}

/// Build the profile view for `identity` from a one-shot read.
pub async fn profile_summary<S: DocumentStore>(
    store: &S,
    identity: &Identity,
) -> Result<ProfileSummary, StoreError> {
    let document = store.get(&identity.user_id).await?.map(WatchlistDocument::dedup);

    Ok(ProfileSummary {
        user_id: identity.user_id.clone(),
        email: identity.email.clone(),
        display_name: identity.display_name.clone(),
        watchlist_count: document.as_ref().map_or(0, WatchlistDocument::len),
        document_name: document.and_then(|doc| doc.name),
    })
}
