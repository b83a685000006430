//! Persisted bearer token + user record.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written by `SessionContext::login`, read once by
//! `SessionContext::initialize`, and read on every authenticated request by
//! the gateway. The layout is two string entries: `token` and `user` (JSON).

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::sync::Arc;

use super::storage::{KeyValueStorage, StorageError};
use crate::net::types::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// A bearer token and the account it belongs to, always kept as a pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub user: User,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("stored user record is not valid JSON: {0}")]
    MalformedUser(#[from] serde_json::Error),
    #[error("stored token is empty")]
    EmptyToken,
    #[error("stored credential is missing its token or user entry")]
    Incomplete,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Typed view over a [`KeyValueStorage`] backend.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the persisted credential.
    ///
    /// Returns `Ok(None)` when neither entry exists, matching a user who
    /// never logged in.
    ///
    /// # Errors
    ///
    /// Returns an error when only one entry exists, the user record does not
    /// parse, the token is blank, or the backend cannot be read.
    pub fn load(&self) -> Result<Option<Credential>, CredentialError> {
        let token = self.storage.get_item(TOKEN_KEY)?;
        let user = self.storage.get_item(USER_KEY)?;
        let (token, raw_user) = match (token, user) {
            (None, None) => return Ok(None),
            (Some(token), Some(raw_user)) => (token, raw_user),
            _ => return Err(CredentialError::Incomplete),
        };
        if token.trim().is_empty() {
            return Err(CredentialError::EmptyToken);
        }
        let user: User = serde_json::from_str(&raw_user)?;
        Ok(Some(Credential { token, user }))
    }

    /// Current bearer token, if any. Read failures count as "no token".
    pub fn token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("token store: read failed: {e}");
                None
            }
        }
    }

    /// Persist both entries.
    ///
    /// # Errors
    ///
    /// Returns an error if either write is rejected. A rejected user write
    /// removes the token again so the pair never persists half-written.
    pub fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let raw_user = serde_json::to_string(user)?;
        self.storage.set_item(TOKEN_KEY, token)?;
        if let Err(e) = self.storage.set_item(USER_KEY, &raw_user) {
            let _ = self.storage.remove_item(TOKEN_KEY);
            return Err(e);
        }
        Ok(())
    }

    /// Remove both entries. Failures are logged; clearing is best-effort.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                log::warn!("token store: failed to remove `{key}`: {e}");
            }
        }
    }

    /// Clear only if the stored token still equals `expected`.
    ///
    /// Returns whether the store was cleared. A request that was sent with
    /// an old token must not wipe a credential written by a newer login.
    pub fn clear_if_token(&self, expected: &str) -> bool {
        if self.token().as_deref() != Some(expected) {
            return false;
        }
        self.clear();
        true
    }
}
