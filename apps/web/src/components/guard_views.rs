//! Full-page placeholders rendered by `ProtectedRoute` instead of its children.

use crate::components::Spinner;
use leptos::prelude::*;

/// Shown while the session is still being resolved.
#[component]
pub fn LoadingScreen() -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center">
            <div class="text-center space-y-4">
                <Spinner />
                <p class="text-gray-500 dark:text-gray-400">"Loading..."</p>
            </div>
        </div>
    }
}

/// Signed in, but without the role the route requires.
#[component]
pub fn Forbidden() -> impl IntoView {
    let go_back = move |_| {
        if let Some(history) = web_sys::window().and_then(|window| window.history().ok()) {
            let _ = history.back();
        }
    };

    view! {
        <div class="min-h-screen flex items-center justify-center px-4">
            <div class="text-center max-w-md space-y-4">
                <h2 class="text-2xl font-bold text-gray-900 dark:text-white">"Access Denied"</h2>
                <p class="text-gray-500 dark:text-gray-400">
                    "You do not have permission to view this page."
                </p>
                <button
                    type="button"
                    class="px-6 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg"
                    on:click=go_back
                >
                    "Go Back"
                </button>
            </div>
        </div>
    }
}
