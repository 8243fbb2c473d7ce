//! Landing route for the Google redirect. Stores the token pair from the
//! query string, re-reads the session, then leaves for the home route. A
//! callback without both tokens shows the error and falls back to login.

use crate::components::{Alert, AlertKind, Spinner};
use crate::features::auth::state::use_auth;
use auth_session::oauth::{CallbackOutcome, OAuthCallback};
use gloo_timers::callback::Timeout;
use leptos::{prelude::*, task::spawn_local};
use leptos_router::{
    hooks::{use_location, use_navigate},
    NavigateOptions,
};

#[component]
pub fn GoogleCallbackPage() -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let navigate = use_navigate();
    let (failure, set_failure) = signal::<Option<String>>(None);

    let query = location.search.get_untracked();
    let store = auth.store();
    let outcome = OAuthCallback::from_query(&query).complete(store.tokens());

    let replace = NavigateOptions {
        replace: true,
        ..NavigateOptions::default()
    };

    match outcome {
        CallbackOutcome::Success { redirect_to } => {
            spawn_local(async move {
                store.sync_from_storage().await;
                navigate(redirect_to, replace);
            });
        }
        CallbackOutcome::Failed {
            message,
            redirect_to,
            delay,
        } => {
            set_failure.set(Some(message));
            let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, move || navigate(redirect_to, replace)).forget();
        }
    }

    view! {
        <div class="min-h-screen flex items-center justify-center px-4">
            <div class="text-center max-w-sm space-y-4">
                {move || match failure.get() {
                    Some(message) => {
                        view! {
                            <Alert kind=AlertKind::Error message=message />
                            <p class="text-sm text-gray-500 dark:text-gray-400">
                                "Returning to the sign-in page..."
                            </p>
                        }
                            .into_any()
                    }
                    None => {
                        view! {
                            <Spinner label="Completing sign-in" />
                            <p class="text-gray-500 dark:text-gray-400">"Signing you in..."</p>
                        }
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}
