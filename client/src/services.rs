//! Startup wiring for the session, gateway, and logout bus.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every front end needs the same object graph: one token store shared by
//! the session and the gateway, and one logout bus the gateway publishes on
//! and the session listens to. `ClientServices` builds that graph once and
//! initializes the session from storage.

#[cfg(test)]
#[path = "services_test.rs"]
mod services_test;

use std::sync::Arc;

use leptos::prelude::*;

use crate::config::ClientConfig;
use crate::net::gateway::ApiGateway;
use crate::net::transport::HttpTransport;
use crate::state::auth::AuthState;
use crate::state::events::LogoutBus;
use crate::state::session::SessionContext;
use crate::util::auth::provide_session;
use crate::util::storage::KeyValueStorage;
use crate::util::token_store::TokenStore;

/// The shared client object graph.
#[derive(Clone, Debug)]
pub struct ClientServices {
    pub logout_bus: LogoutBus,
    pub session: SessionContext,
    pub gateway: ApiGateway,
}

impl ClientServices {
    /// Wire the services over `storage` and `transport` and load any
    /// persisted session.
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStorage>, transport: Arc<dyn HttpTransport>) -> Self {
        let logout_bus = LogoutBus::new();
        let store = TokenStore::new(storage);
        let session = SessionContext::new(store.clone(), &logout_bus);
        let gateway = ApiGateway::new(config, transport, store, logout_bus.clone());
        session.initialize();
        Self { logout_bus, session, gateway }
    }

    /// Services backed by `localStorage` and `fetch`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the compiled-in API base URL is invalid.
    #[cfg(feature = "hydrate")]
    pub fn browser() -> Result<Self, crate::config::ConfigError> {
        use crate::net::transport::GlooTransport;
        use crate::util::storage::BrowserStorage;

        let config = ClientConfig::from_env()?;
        Ok(Self::new(config, Arc::new(BrowserStorage), Arc::new(GlooTransport)))
    }

    /// Services backed by a JSON state file and `reqwest`.
    #[cfg(feature = "native")]
    pub fn native(config: ClientConfig, state_file: impl Into<std::path::PathBuf>) -> Self {
        use crate::net::transport::ReqwestTransport;
        use crate::util::storage::FileStorage;

        Self::new(
            config,
            Arc::new(FileStorage::new(state_file)),
            Arc::new(ReqwestTransport::default()),
        )
    }

    /// Publish the session, gateway, and reactive [`AuthState`] as Leptos
    /// context for the current owner.
    pub fn provide(&self) -> RwSignal<AuthState> {
        provide_context(self.gateway.clone());
        provide_session(self.session.clone(), &self.logout_bus)
    }
}
