//! Reusable Leptos components.

pub mod protected_route;
