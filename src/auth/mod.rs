//! Identity provider binding — who is signed in, and how that changes.
//!
//! The hosted identity service is an external collaborator. The SDK only
//! needs the [`IdentityProvider`] surface below: the watchlist sync core
//! never reads an ambient "current user"; it is told about every change
//! through [`crate::sync::WatchlistSync::on_identity_changed`], usually by
//! binding it to [`IdentityProvider::on_identity_changed`].
//!
//! [`memory::MemoryIdentityProvider`] is an in-process implementation used
//! by tests and local development.

pub mod memory;

use crate::error::AuthError;
use crate::shared::{SubscriptionHandle, UserId};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// Identity
// ============================================================================

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name shown in the header: display name, else email, else the user id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.user_id.as_str())
    }
}

/// Federated sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FederatedProvider {
    Google,
}

impl FederatedProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

impl std::fmt::Display for FederatedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Callback invoked with the current identity on every change.
pub type IdentityListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Minimum password length enforced on sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

// ============================================================================
// IdentityProvider
// ============================================================================

/// The identity service surface the SDK depends on.
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<Identity>;

    /// Email/password sign-in.
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Create an email/password account and sign it in. A non-blank
    /// `display_name` is stored on the account's profile.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Sign in through a federated provider, creating the account on first use.
    fn sign_in_federated(
        &self,
        provider: FederatedProvider,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Send a password-reset email.
    fn send_password_reset(&self, email: &str)
        -> impl Future<Output = Result<(), AuthError>> + Send;

    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Register for identity changes. The listener is called once right away
    /// with the current user, then after every sign-in and sign-out.
    fn on_identity_changed(&self, listener: IdentityListener) -> SubscriptionHandle;
}

/// Basic shape check shared by providers before talking to a backend.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AuthError::InvalidEmail(email.to_string())),
    }
}
