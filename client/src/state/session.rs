//! Process-wide authentication session.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionContext` is the single source of truth for "who is logged in".
//! It is created once at startup, handed to consumers explicitly (or through
//! Leptos context), and is the only writer of session state besides the
//! gateway's logout notice.
//!
//! LIFECYCLE
//! =========
//! `new` (loading) → `initialize` (reads the token store once) → any number
//! of `login`/`logout` calls. A `LogoutNotice` from the gateway clears the
//! in-memory session without touching navigation.
//!
//! INVARIANTS
//! ==========
//! Token and user live in one `Option<Credential>`, so a session can never
//! hold one without the other. A logout notice that names a token other than
//! the current one is ignored: a stale `401` must not undo a newer login.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::events::{EventBus, LogoutBus, LogoutNotice, Subscription};
use crate::net::types::User;
use crate::util::storage::StorageError;
use crate::util::token_store::{Credential, TokenStore};

/// Snapshot of the authentication state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    credential: Option<Credential>,
    is_loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self { credential: None, is_loading: true }
    }
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.credential.as_ref().map(|c| &c.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.credential.as_ref().map(|c| c.token.as_str())
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// True until the token store has been read once.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}

struct SessionInner {
    state: Mutex<Session>,
    store: TokenStore,
    changes: EventBus<Session>,
    logout_subscription: Mutex<Option<Subscription>>,
}

/// Shared handle to the session service. Clones refer to the same session.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").field("session", &self.snapshot()).finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Create a loading session over `store`, listening for gateway logout
    /// notices on `logout_bus`.
    pub fn new(store: TokenStore, logout_bus: &LogoutBus) -> Self {
        let inner = Arc::new(SessionInner {
            state: Mutex::new(Session::default()),
            store,
            changes: EventBus::new(),
            logout_subscription: Mutex::new(None),
        });

        let weak: Weak<SessionInner> = Arc::downgrade(&inner);
        let subscription = logout_bus.subscribe(move |notice: &LogoutNotice| {
            if let Some(inner) = weak.upgrade() {
                SessionContext { inner }.handle_external_logout(notice);
            }
        });
        *inner.logout_subscription.lock().unwrap_or_else(PoisonError::into_inner) = Some(subscription);

        Self { inner }
    }

    fn state(&self) -> MutexGuard<'_, Session> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `update` under the lock and publish the new snapshot if it
    /// changed anything.
    fn update<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut Session),
    {
        let snapshot = {
            let mut state = self.state();
            let before = state.clone();
            update(&mut state);
            if *state == before {
                return false;
            }
            state.clone()
        };
        self.inner.changes.emit(&snapshot);
        true
    }

    /// Read the persisted credential once and leave the loading state.
    ///
    /// A malformed credential is cleared from storage and treated as
    /// "never logged in". Calls after the first are ignored.
    pub fn initialize(&self) {
        if !self.is_loading() {
            log::debug!("session: initialize called twice; ignoring");
            return;
        }

        let credential = match self.inner.store.load() {
            Ok(credential) => credential,
            Err(e) => {
                log::warn!("session: discarding stored credential: {e}");
                self.inner.store.clear();
                None
            }
        };

        self.update(|state| {
            state.credential = credential;
            state.is_loading = false;
        });
    }

    /// Start a session for `user` and persist it.
    ///
    /// The in-memory session is updated even if persistence fails, so the
    /// current process stays logged in; the error tells the caller the
    /// session will not survive a reload.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the credential could not be persisted.
    pub fn login(&self, token: impl Into<String>, user: User) -> Result<(), StorageError> {
        let credential = Credential { token: token.into(), user };
        log::info!("session: login user_id={}", credential.user.id);

        let persisted = self.inner.store.save(&credential.token, &credential.user);
        if let Err(e) = &persisted {
            log::warn!("session: failed to persist credential: {e}");
        }
        self.update(|state| {
            state.credential = Some(credential);
            state.is_loading = false;
        });
        persisted
    }

    /// End the session and remove the stored credential. Safe to call when
    /// already logged out.
    pub fn logout(&self) {
        self.inner.store.clear();
        if self.update(|state| state.credential = None) {
            log::info!("session: logout");
        }
    }

    /// Clear the in-memory session in response to a gateway notice.
    ///
    /// Returns whether the session was cleared.
    pub fn handle_external_logout(&self, notice: &LogoutNotice) -> bool {
        let current = self.token();
        match (current.as_deref(), notice.rejected_token.as_deref()) {
            (None, _) => false,
            (Some(current), Some(rejected)) if current != rejected => {
                log::debug!("session: ignoring logout notice for a superseded token");
                false
            }
            _ => {
                log::info!("session: expired by server");
                self.update(|state| state.credential = None)
            }
        }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.state().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state().token().map(str::to_owned)
    }

    pub fn store(&self) -> &TokenStore {
        &self.inner.store
    }

    /// Observe every session change until the handle is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn watch<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        self.inner.changes.subscribe(listener)
    }
}
