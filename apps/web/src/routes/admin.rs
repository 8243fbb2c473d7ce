//! Admin landing page. Only the guard decides who sees it; the API checks the
//! role again on every admin request.

use crate::{
    components::AppShell,
    features::auth::{state::use_auth, ProtectedRoute},
    routes::paths,
};
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = use_auth();

    view! {
        <AppShell>
            <ProtectedRoute require_admin=true>
                <div class="space-y-6">
                    <div class="space-y-1">
                        <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">
                            "Admin Dashboard"
                        </h1>
                        <p class="text-sm text-gray-500 dark:text-gray-400">
                            {move || {
                                auth.user
                                    .get()
                                    .map(|user| format!("Signed in as {} ({}).", user.email, user.role.map_or("none", |role| role.as_str())))
                                    .unwrap_or_default()
                            }}
                        </p>
                    </div>
                    <A
                        href=paths::ACCOUNT
                        {..}
                        class="block p-6 bg-white dark:bg-gray-800 rounded-xl border border-gray-200 dark:border-gray-700 shadow-sm hover:border-blue-500"
                    >
                        <h2 class="font-semibold text-gray-900 dark:text-white">"Your account"</h2>
                        <p class="text-sm text-gray-500">"Review the profile and session of this admin."</p>
                    </A>
                </div>
            </ProtectedRoute>
        </AppShell>
    }
}
