use crate::components::{Forbidden, LoadingScreen};
use crate::features::auth::state::use_auth;
use auth_session::guard::{self, GuardOptions, GuardOutcome};
use leptos::prelude::*;
use leptos_router::{components::Redirect, hooks::use_location, NavigateOptions};

/// Renders `children` only for a signed-in session, and for admins when
/// `require_admin` is set. UX-only; the API enforces access on its own.
#[component]
pub fn ProtectedRoute(
    #[prop(optional)] require_admin: bool,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let options = GuardOptions { require_admin };

    let outcome = Memo::new(move |_| {
        let attempted =
            guard::attempted_location(&location.pathname.get(), &location.search.get());
        auth.state
            .with(|state| guard::evaluate(state, options, &attempted))
    });

    move || match outcome.get() {
        GuardOutcome::Loading => view! { <LoadingScreen /> }.into_any(),
        GuardOutcome::Redirect { from, .. } => {
            let options = NavigateOptions {
                replace: true,
                ..NavigateOptions::default()
            };
            view! { <Redirect path=guard::login_href(&from) options=options /> }.into_any()
        }
        GuardOutcome::Forbidden => view! { <Forbidden /> }.into_any(),
        GuardOutcome::Render => children().into_any(),
    }
}
