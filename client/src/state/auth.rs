//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! A plain mirror of [`Session`](super::session::Session) held in a
//! `RwSignal` so route guards and user-aware components re-render on login,
//! logout, and server-side expiry.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::session::Session;
use crate::net::types::User;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
    /// Set when the server rejected the token; cleared by the next login.
    pub expired: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, loading: true, expired: false }
    }
}

impl AuthState {
    pub fn from_session(session: &Session) -> Self {
        Self { user: session.user().cloned(), loading: session.is_loading(), expired: false }
    }

    /// Apply a new session snapshot, keeping the expiry flag until a user
    /// logs in again.
    pub fn sync(&mut self, session: &Session) {
        self.user = session.user().cloned();
        self.loading = session.is_loading();
        if self.user.is_some() {
            self.expired = false;
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
