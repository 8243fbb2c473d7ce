//! Shared layout wrapper with navigation and content container. Navigation is
//! client-side only; the backend enforces access control on every request.

use crate::features::auth::state::use_auth;
use crate::routes::paths;
use leptos::prelude::*;
use leptos_router::{components::A, hooks::use_location};

const NAV_LINK: &str = "block py-2 px-3 text-gray-900 rounded hover:bg-gray-100 md:hover:bg-transparent md:border-0 md:hover:text-blue-700 md:p-0 dark:text-white";

/// Wraps routes with a header and main content container.
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let (menu_open, set_menu_open) = signal(false);
    let auth = use_auth();
    let location = use_location();
    let on_login = move || location.pathname.get() == paths::LOGIN;
    let is_admin = move || auth.user.get().is_some_and(|user| user.is_admin());

    view! {
        <div class="min-h-screen flex flex-col">
            <header class="border-gray-200 dark:bg-gray-900">
                <div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4">
                    <A href=paths::HOME {..} class="font-semibold whitespace-nowrap dark:text-white">
                        "VortixPR"
                    </A>
                    <button
                        type="button"
                        class="inline-flex items-center p-2 w-10 h-10 justify-center text-sm text-gray-500 rounded-lg md:hidden"
                        aria-controls="navbar-default"
                        aria-expanded=move || menu_open.get().to_string()
                        on:click=move |_| set_menu_open.update(|open| *open = !*open)
                    >
                        <span class="sr-only">"Open main menu"</span>
                        "☰"
                    </button>
                    <div
                        id="navbar-default"
                        class="w-full md:block md:w-auto"
                        class:hidden=move || !menu_open.get()
                    >
                        <ul class="font-medium flex flex-col p-4 md:p-0 mt-4 md:flex-row md:space-x-8 md:mt-0">
                            <Show when=is_admin>
                                <li>
                                    <A href=paths::ADMIN {..} class=NAV_LINK>
                                        "Admin"
                                    </A>
                                </li>
                            </Show>
                            <li>
                                <Show
                                    when=move || auth.is_authenticated.get()
                                    fallback=move || {
                                        view! {
                                            <Show when=move || !on_login()>
                                                <A
                                                    href=paths::LOGIN
                                                    {..}
                                                    class=NAV_LINK
                                                    on:click=move |_| set_menu_open.set(false)
                                                >
                                                    "Sign In"
                                                </A>
                                            </Show>
                                        }
                                    }
                                >
                                    <A href=paths::ACCOUNT {..} class=NAV_LINK>
                                        {move || auth.user.get().map(|user| user.name).unwrap_or_default()}
                                    </A>
                                </Show>
                            </li>
                            <Show when=move || auth.is_authenticated.get()>
                                <li>
                                    <button
                                        type="button"
                                        class=NAV_LINK
                                        on:click=move |_| {
                                            auth.logout();
                                            set_menu_open.set(false);
                                        }
                                    >
                                        "Sign Out"
                                    </button>
                                </li>
                            </Show>
                        </ul>
                    </div>
                </div>
            </header>
            <main class="flex-1">
                <div class="max-w-screen-xl mx-auto p-4">{children()}</div>
            </main>
        </div>
    }
}
