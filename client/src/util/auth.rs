//! Shared auth UI helpers: route-guard decisions and session wiring.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected views apply identical redirect behavior. The guard is a small
//! state machine over [`AuthState`]: `Loading` shows a placeholder, an
//! authenticated user sees the view, anyone else is sent to `/login` with
//! the requested path in `?from=` so the login flow can return there.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::net::error::SESSION_EXPIRED_MESSAGE;
use crate::state::auth::AuthState;
use crate::state::events::LogoutBus;
use crate::state::session::SessionContext;

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";
const FROM_PARAM: &str = "from";

/// What a protected route should render for the current auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    Render,
    /// Navigate (replacing history) to this login URL.
    Redirect(String),
}

/// Decide how a protected view at `requested_path` should render.
pub fn guard_decision(state: &AuthState, requested_path: &str) -> GuardDecision {
    if state.loading {
        GuardDecision::Loading
    } else if state.is_authenticated() {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect(login_redirect_path(requested_path))
    }
}

/// Join a router pathname and query string (with or without `?`).
pub fn requested_location(pathname: &str, search: &str) -> String {
    let search = search.strip_prefix('?').unwrap_or(search);
    if search.is_empty() {
        pathname.to_owned()
    } else {
        format!("{pathname}?{search}")
    }
}

/// Login URL that returns to `from` after a successful login.
pub fn login_redirect_path(from: &str) -> String {
    if from.is_empty() || from == HOME_ROUTE || from.starts_with(LOGIN_ROUTE) {
        return LOGIN_ROUTE.to_owned();
    }
    format!("{LOGIN_ROUTE}?{FROM_PARAM}={}", urlencoding::encode(from))
}

/// Where to navigate after login, given the login page's query string.
///
/// Only local absolute paths are honored; anything else returns home.
pub fn post_login_target(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == FROM_PARAM)
        .and_then(|(_, v)| urlencoding::decode(v).ok())
        .map(std::borrow::Cow::into_owned)
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| HOME_ROUTE.to_owned())
}

/// Explanatory message for the login page, if the session was expired by
/// the server.
pub fn login_notice(state: &AuthState) -> Option<&'static str> {
    state.expired.then_some(SESSION_EXPIRED_MESSAGE)
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Publish `session` and a reactive [`AuthState`] mirror as Leptos context.
///
/// The mirror follows every session change and flags `expired` when the
/// gateway reports a rejected token. Subscriptions end with the owning
/// reactive scope.
pub fn provide_session(session: SessionContext, logout_bus: &LogoutBus) -> RwSignal<AuthState> {
    let auth = RwSignal::new(AuthState::from_session(&session.snapshot()));

    let watch = session.watch(move |snapshot| {
        auth.try_update(|state| state.sync(snapshot));
    });
    // The session subscribed to the bus first, so a notice for a superseded
    // token has already been ignored and the user is still present here.
    let expired = logout_bus.subscribe(move |_| {
        auth.try_update(|state| {
            if state.user.is_none() {
                state.expired = true;
            }
        });
    });
    on_cleanup(move || {
        drop(watch);
        drop(expired);
    });

    provide_context(session);
    provide_context(auth);
    auth
}
