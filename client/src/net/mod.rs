//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `gateway` owns auth-aware dispatch, `api` layers typed endpoints on top,
//! `transport` abstracts the HTTP stack, and `types` defines the wire schema.

pub mod api;
pub mod error;
pub mod gateway;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
