//! # client
//!
//! Authentication core for the proteInternet web client: persisted session,
//! authenticated REST gateway, route guard, and the form helpers the login,
//! registration, and review pages share.
//!
//! The same crate serves the Leptos front end (`hydrate`/`ssr`) and native
//! tools (`native`, used by `protein-cli`). Browser-only pieces sit behind
//! `#[cfg(feature = "hydrate")]`.

pub mod components;
pub mod config;
pub mod net;
pub mod services;
pub mod state;
pub mod util;

/// Route `log` output and panics to the browser console.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn init_browser_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}
