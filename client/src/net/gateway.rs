//! Auth-aware request dispatch.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every REST call goes through [`ApiGateway::request`]. It attaches the
//! stored bearer token when the call requires auth and turns a `401` on such
//! a call into a global logout: the stored credential is cleared and a
//! [`LogoutNotice`] goes out on the logout bus before the caller sees
//! [`ApiError::AuthenticationExpired`].
//!
//! ERROR HANDLING
//! ==============
//! - no response → `ApiError::Network`, no state change
//! - `401` with auth → `ApiError::AuthenticationExpired`, credential cleared
//! - other statuses → returned as `Ok(HttpResponse)` for the caller to judge
//!
//! CONCURRENCY
//! ===========
//! Clearing is compare-and-clear on the token the request carried. When
//! several in-flight requests fail with the same stale token only the first
//! clears and notifies; a `401` for a token that a newer login has replaced
//! clears nothing. A `401` for a request that carried no token clears
//! nothing and sends no notice.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use super::types::ErrorBody;
use crate::config::ClientConfig;
use crate::state::events::{LogoutBus, LogoutNotice};
use crate::util::token_store::TokenStore;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Per-call options. Calls require auth unless marked [`public`](Self::public).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub require_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::Get, headers: Vec::new(), body: None, require_auth: true }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    /// Options carrying `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encode` if `body` fails to serialize.
    pub fn json<T: Serialize + ?Sized>(method: Method, body: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(Self { method, body: Some(body), ..Self::default() })
    }

    /// Send without a bearer token and without 401 logout handling.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.require_auth = false;
        self
    }

    #[must_use]
    pub fn require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = require_auth;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Shared REST gateway. Clones share transport, token store and bus.
#[derive(Clone)]
pub struct ApiGateway {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    store: TokenStore,
    logout_bus: LogoutBus,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ApiGateway {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        store: TokenStore,
        logout_bus: LogoutBus,
    ) -> Self {
        Self { config, transport, store, logout_bus }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn logout_bus(&self) -> &LogoutBus {
        &self.logout_bus
    }

    /// Build the outbound request for `path` and return it with the token
    /// that was attached.
    fn build(&self, path: &str, options: RequestOptions) -> (HttpRequest, Option<String>) {
        let mut headers = Vec::with_capacity(options.headers.len() + 2);
        if !options.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(CONTENT_TYPE)) {
            headers.push((CONTENT_TYPE.to_owned(), JSON_CONTENT_TYPE.to_owned()));
        }
        headers.extend(options.headers);

        let token = if options.require_auth { self.store.token() } else { None };
        if let Some(token) = &token {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(AUTHORIZATION));
            headers.push((AUTHORIZATION.to_owned(), format!("Bearer {token}")));
        }

        let request = HttpRequest {
            method: options.method,
            url: self.config.endpoint(path),
            headers,
            body: options.body,
        };
        (request, token)
    }

    /// Dispatch a request.
    ///
    /// # Errors
    ///
    /// - `ApiError::Network` when no response arrived
    /// - `ApiError::AuthenticationExpired` on `401` when `require_auth` is set
    ///
    /// Other non-2xx responses are returned as `Ok`.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
        let require_auth = options.require_auth;
        let (request, token) = self.build(path, options);
        let method = request.method;
        let url = request.url.clone();

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("gateway: {} {url} failed: {e}", method.as_str());
                return Err(ApiError::Network(e.0));
            }
        };
        log::debug!("gateway: {} {url} -> {}", method.as_str(), response.status);

        if response.status == 401 && require_auth {
            self.expire(token);
            return Err(ApiError::AuthenticationExpired);
        }
        Ok(response)
    }

    fn expire(&self, rejected_token: Option<String>) {
        let Some(rejected_token) = rejected_token else {
            log::debug!("gateway: 401 without a session; nothing to expire");
            return;
        };
        if self.store.clear_if_token(&rejected_token) {
            log::info!("gateway: server rejected credential; logging out");
            self.logout_bus.emit(&LogoutNotice { rejected_token: Some(rejected_token) });
        } else {
            log::debug!("gateway: 401 for a superseded token; credential kept");
        }
    }

    /// # Errors
    ///
    /// See [`ApiGateway::request`].
    pub async fn get(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.request(path, RequestOptions::new(Method::Get)).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::request`]; also fails if `body` cannot be serialized.
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, ApiError> {
        self.request(path, RequestOptions::json(Method::Post, body)?).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::request`]; also fails if `body` cannot be serialized.
    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<HttpResponse, ApiError> {
        self.request(path, RequestOptions::json(Method::Put, body)?).await
    }

    /// # Errors
    ///
    /// See [`ApiGateway::request`].
    pub async fn delete(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.request(path, RequestOptions::new(Method::Delete)).await
    }
}

/// Decode a successful response body.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the body does not match `T`.
pub fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Convert a non-2xx response into `ApiError::Status`.
///
/// The message is the server's `{"error": ...}` text, else the raw body,
/// else `fallback`.
pub fn status_error(response: &HttpResponse, fallback: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .map(|b| b.error)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .or_else(|| Some(response.body.trim().to_owned()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| fallback.to_owned());
    ApiError::Status { status: response.status, message }
}

/// Decode `response` as `T` when it is 2xx, else build a status error.
///
/// # Errors
///
/// Returns `ApiError::Status` for non-2xx and `ApiError::Decode` for bodies
/// that do not match `T`.
pub fn expect_json<T: DeserializeOwned>(response: &HttpResponse, fallback: &str) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(status_error(response, fallback));
    }
    decode_json(response)
}
