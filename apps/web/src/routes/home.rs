use crate::{
    components::{AppShell, Spinner},
    features::auth::state::use_auth,
    routes::paths,
};
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    view! {
        <AppShell>
            <section class="max-w-2xl mx-auto py-12 space-y-4 text-center">
                <h1 class="text-3xl font-bold text-gray-900 dark:text-white">
                    "Press distribution that reaches the right desks"
                </h1>
                {move || {
                    if auth.is_loading.get() {
                        view! { <Spinner /> }.into_any()
                    } else if let Some(user) = auth.user.get() {
                        view! {
                            <p class="text-gray-500 dark:text-gray-400">
                                {format!("Welcome back, {}.", user.name)}
                            </p>
                        }
                            .into_any()
                    } else {
                        view! {
                            <A
                                href=paths::LOGIN
                                {..}
                                class="inline-flex items-center px-5 py-2.5 text-sm font-medium text-white bg-blue-700 rounded-lg hover:bg-blue-800"
                            >
                                "Get started"
                            </A>
                        }
                            .into_any()
                    }
                }}
            </section>
        </AppShell>
    }
}
