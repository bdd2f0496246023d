//! Route table — the path contract the presentation layer renders against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every page the front-end exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Login,
    Signup,
    ForgotPassword,
    Markets,
    Watchlist,
    Profile,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Login,
        Route::Signup,
        Route::ForgotPassword,
        Route::Markets,
        Route::Watchlist,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::ForgotPassword => "/forgot-password",
            Route::Markets => "/markets",
            Route::Watchlist => "/watchlist",
            Route::Profile => "/profile",
        }
    }

    /// Resolve a request path. Trailing slashes, query strings and fragments are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// Pages that only make sense with a signed-in identity.
    pub fn requires_identity(&self) -> bool {
        matches!(self, Route::Watchlist | Route::Profile)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_from_path_normalizes() {
        assert_eq!(Route::from_path(""), Some(Route::Home));
        assert_eq!(Route::from_path("/markets/"), Some(Route::Markets));
        assert_eq!(Route::from_path("/watchlist?sort=name"), Some(Route::Watchlist));
        assert_eq!(Route::from_path("/profile#top"), Some(Route::Profile));
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[test]
    fn test_requires_identity() {
        let guarded: Vec<Route> = Route::ALL
            .into_iter()
            .filter(Route::requires_identity)
            .collect();
        assert_eq!(guarded, vec![Route::Watchlist, Route::Profile]);
    }
}
