use super::*;
use leptos::reactive::owner::Owner;
use std::sync::Arc;

fn members_only() -> ChildrenFn {
    Arc::new(|| view! { <p class="members">"members only"</p> }.into_any())
}

#[test]
fn loading_renders_placeholder_without_children() {
    let owner = Owner::new();
    let html = owner.with(|| guard_view(GuardDecision::Loading, &members_only()).to_html());

    assert!(html.contains("route-guard--loading"));
    assert!(html.contains("Loading..."));
    assert!(!html.contains("members only"));
}

#[test]
fn render_shows_children() {
    let owner = Owner::new();
    let html = owner.with(|| guard_view(GuardDecision::Render, &members_only()).to_html());

    assert!(html.contains("members only"));
    assert!(!html.contains("route-guard"));
}
