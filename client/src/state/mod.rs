//! Client-side application state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` is the authoritative auth service, `auth` is its UI mirror, and
//! `events` carries notifications between the gateway and the session.

pub mod auth;
pub mod events;
pub mod session;
