//! Route guard component for views that require a logged-in user.

#[cfg(all(test, feature = "ssr"))]
#[path = "protected_route_test.rs"]
mod protected_route_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::state::auth::AuthState;
use crate::util::auth::{GuardDecision, guard_decision, requested_location};

/// Render `children` only for an authenticated user.
///
/// Shows a loading placeholder until the session has read storage, then
/// either renders the view or redirects to `/login?from=<path>`. Requires
/// the `RwSignal<AuthState>` context from
/// [`provide_session`](crate::util::auth::provide_session).
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let location = use_location();

    move || {
        let requested = requested_location(&location.pathname.get(), &location.search.get());
        let decision = auth.with(|state| guard_decision(state, &requested));
        guard_view(decision, &children)
    }
}

fn guard_view(decision: GuardDecision, children: &ChildrenFn) -> AnyView {
    match decision {
        GuardDecision::Loading => view! {
            <div class="route-guard route-guard--loading">
                <div class="route-guard__spinner"></div>
                <p>"Loading..."</p>
            </div>
        }
        .into_any(),
        GuardDecision::Render => children().into_any(),
        GuardDecision::Redirect(path) => view! { <Redirect path=path/> }.into_any(),
    }
}
