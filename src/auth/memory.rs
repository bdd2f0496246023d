//! In-process identity provider.
//!
//! Behaves like the hosted service as far as the SDK can observe: accounts
//! keyed by email, opaque ids, change notifications delivered to every
//! active listener. Nothing is persisted.

use super::{
    validate_email, FederatedProvider, Identity, IdentityListener, IdentityProvider,
    MIN_PASSWORD_LEN,
};
use crate::error::AuthError;
use crate::shared::{SubscriptionHandle, UserId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

struct Account {
    password: String,
    identity: Identity,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    /// Account the federated popup resolves to, per provider.
    federated_profiles: HashMap<FederatedProvider, (String, Option<String>)>,
    federated_accounts: HashMap<(FederatedProvider, String), Identity>,
    current: Option<Identity>,
    listeners: Vec<(SubscriptionHandle, IdentityListener)>,
    password_resets: Vec<String>,
}

#[derive(Default)]
pub struct MemoryIdentityProvider {
    inner: Mutex<Inner>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure who a federated sign-in with `provider` resolves to.
    pub fn with_federated_profile(
        self,
        provider: FederatedProvider,
        email: &str,
        display_name: Option<&str>,
    ) -> Self {
        self.lock().federated_profiles.insert(
            provider,
            (normalize(email), display_name.map(str::to_string)),
        );
        self
    }

    /// Emails that were sent a password-reset link, oldest first.
    pub fn password_resets(&self) -> Vec<String> {
        self.lock().password_resets.clone()
    }

    /// Number of listeners that have not been cancelled.
    pub fn listener_count(&self) -> usize {
        self.lock()
            .listeners
            .iter()
            .filter(|(handle, _)| handle.is_active())
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Swap the current identity and notify listeners outside the lock.
    fn set_current(&self, next: Option<Identity>) {
        let listeners: Vec<IdentityListener> = {
            let mut inner = self.lock();
            if inner.current == next {
                return;
            }
            inner.current = next.clone();
            inner.listeners.retain(|(handle, _)| handle.is_active());
            inner
                .listeners
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect()
        };

        tracing::info!(
            user_id = next.as_ref().map(|i| i.user_id.as_str()).unwrap_or("-"),
            "Identity changed"
        );
        for listener in listeners {
            listener(next.clone());
        }
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    fn current_user(&self) -> Option<Identity> {
        self.lock().current.clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        validate_email(email)?;
        let identity = {
            let inner = self.lock();
            match inner.accounts.get(&normalize(email)) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, AuthError> {
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        let key = normalize(email);
        let identity = {
            let mut inner = self.lock();
            if inner.accounts.contains_key(&key) {
                return Err(AuthError::EmailInUse(key));
            }
            let mut identity = Identity::new(new_user_id()).with_email(key.clone());
            identity.display_name = display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            inner.accounts.insert(
                key,
                Account {
                    password: password.to_string(),
                    identity: identity.clone(),
                },
            );
            identity
        };

        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_federated(&self, provider: FederatedProvider) -> Result<Identity, AuthError> {
        let identity = {
            let mut inner = self.lock();
            let (email, display_name) = inner
                .federated_profiles
                .get(&provider)
                .cloned()
                .ok_or_else(|| {
                    AuthError::Provider(format!("{} sign-in was cancelled", provider))
                })?;

            inner
                .federated_accounts
                .entry((provider, email.clone()))
                .or_insert_with(|| {
                    let mut identity = Identity::new(new_user_id()).with_email(email);
                    identity.display_name = display_name;
                    identity
                })
                .clone()
        };

        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email)?;
        let key = normalize(email);
        let mut inner = self.lock();
        if !inner.accounts.contains_key(&key) {
            return Err(AuthError::UnknownAccount(key));
        }
        tracing::debug!(email = %key, "Password reset requested");
        inner.password_resets.push(key);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None);
        Ok(())
    }

    fn on_identity_changed(&self, listener: IdentityListener) -> SubscriptionHandle {
        let handle = SubscriptionHandle::new();
        let current = {
            let mut inner = self.lock();
            inner.listeners.push((handle.clone(), listener.clone()));
            inner.current.clone()
        };
        listener(current);
        handle
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_user_id() -> UserId {
    UserId::new(uuid::Uuid::new_v4().simple().to_string())
}
