mod account;
mod admin;
mod google_callback;
mod home;
mod login;
mod not_found;

pub(crate) use account::AccountPage;
pub(crate) use admin::AdminPage;
pub(crate) use google_callback::GoogleCallbackPage;
pub(crate) use home::HomePage;
pub(crate) use login::LoginPage;
pub(crate) use not_found::NotFoundPage;

use leptos::prelude::*;
use leptos_router::components::{Route, Routes};
use leptos_router::path;

pub(crate) mod paths {
    pub const HOME: &str = auth_session::guard::HOME_ROUTE;
    pub const LOGIN: &str = auth_session::guard::LOGIN_ROUTE;
    pub const ACCOUNT: &str = "/account";
    pub const ADMIN: &str = "/admin";
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=HomePage />
            <Route path=path!("/login") view=LoginPage />
            <Route path=path!("/auth/google/callback") view=GoogleCallbackPage />
            <Route path=path!("/account") view=AccountPage />
            <Route path=path!("/admin") view=AdminPage />
            <Route path=path!("/*any") view=NotFoundPage />
        </Routes>
    }
}
