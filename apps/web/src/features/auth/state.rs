//! Auth session state and context for the frontend. The provider owns the one
//! [`SessionStore`] of the app, mirrors its snapshot into a signal, and
//! initialises it once on mount. Token material stays in `localStorage`; only
//! the user projection lives in reactive state.

use crate::features::auth::{client::GlooAuthApi, storage::BrowserStorage};
use auth_session::storage::ACCESS_TOKEN_KEY;
use auth_session::{SessionState, SessionStore, User};
use leptos::{ev, prelude::*, task::spawn_local};
use std::rc::Rc;

pub type WebSessionStore = SessionStore<GlooAuthApi, BrowserStorage>;

#[derive(Clone, Copy)]
/// Auth session context shared through Leptos.
pub struct AuthContext {
    store: StoredValue<Rc<WebSessionStore>, LocalStorage>,
    pub state: RwSignal<SessionState>,
    pub user: Signal<Option<User>>,
    pub is_loading: Signal<bool>,
    pub is_authenticated: Signal<bool>,
    pub error: Signal<Option<String>>,
}

impl AuthContext {
    fn new(store: Rc<WebSessionStore>, state: RwSignal<SessionState>) -> Self {
        Self {
            store: StoredValue::new_local(store),
            state,
            user: Signal::derive(move || state.with(|state| state.user.clone())),
            is_loading: Signal::derive(move || state.with(|state| state.is_loading)),
            is_authenticated: Signal::derive(move || state.with(SessionState::is_authenticated)),
            error: Signal::derive(move || state.with(|state| state.error.clone())),
        }
    }

    /// Shared handle for async operations; never hold a borrow across awaits.
    pub fn store(&self) -> Rc<WebSessionStore> {
        self.store.get_value()
    }

    pub fn logout(&self) {
        self.store().logout();
    }

    pub fn clear_error(&self) {
        self.store().clear_error();
    }
}

/// Provides auth context, initialises the session once on mount, and keeps it
/// in sync when another tab changes the stored tokens.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let state = RwSignal::new(SessionState::default());
    let store = SessionStore::new(GlooAuthApi, BrowserStorage)
        .with_listener(move |snapshot| state.set(snapshot.clone()));
    let auth = AuthContext::new(Rc::new(store), state);
    provide_context(auth);

    spawn_local(async move {
        auth.store().initialize().await;
    });

    // `key` is null when another tab cleared all of storage.
    let handle = window_event_listener(ev::storage, move |event| {
        let key = event.key();
        if key.is_none() || key.as_deref() == Some(ACCESS_TOKEN_KEY) {
            spawn_local(async move {
                auth.store().sync_from_storage().await;
            });
        }
    });
    on_cleanup(move || handle.remove());

    view! { {children()} }
}

/// Returns the auth context provided by [`AuthProvider`].
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
