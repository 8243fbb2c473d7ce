use crate::{features::auth::state::use_auth, routes::paths};
use leptos::prelude::*;
use leptos_router::components::A;

/// Renders the signed-in state on the login route.
#[component]
pub fn AlreadySignedInPanel() -> impl IntoView {
    let auth = use_auth();
    let user_email = Signal::derive(move || {
        auth.user
            .get()
            .map(|user| user.email)
            .unwrap_or_default()
    });

    view! {
        <div class="max-w-sm mx-auto text-center space-y-6 py-8">
            <div class="space-y-2">
                <h2 class="text-xl font-bold text-gray-900 dark:text-white">
                    "Already Signed In"
                </h2>
                <p class="text-gray-500 dark:text-gray-400">
                    "You are currently signed in as "
                    <span class="font-medium text-gray-900 dark:text-gray-200">
                        {move || user_email.get()}
                    </span> "."
                </p>
            </div>
            <div class="flex flex-col gap-3">
                <A
                    href=paths::HOME
                    {..}
                    class="w-full inline-flex justify-center items-center px-5 py-2.5 text-sm font-medium text-white bg-blue-700 rounded-lg hover:bg-blue-800"
                >
                    "Continue"
                </A>
                <button
                    type="button"
                    class="w-full inline-flex justify-center items-center px-5 py-2.5 text-sm font-medium text-gray-900 bg-white border border-gray-200 rounded-lg hover:bg-gray-100"
                    on:click=move |_| auth.logout()
                >
                    "Sign out"
                </button>
            </div>
        </div>
    }
}
