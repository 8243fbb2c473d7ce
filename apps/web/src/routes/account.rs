use crate::{
    components::{Alert, AlertKind, AppShell, Button},
    features::auth::{state::use_auth, ProtectedRoute},
};
use auth_session::User;
use leptos::prelude::*;

/// Signed-in profile with manual session maintenance.
#[component]
pub fn AccountPage() -> impl IntoView {
    let auth = use_auth();
    let (notice, set_notice) = signal::<Option<String>>(None);

    let reload = Action::new_local(move |_: &()| {
        let store = auth.store();
        async move { store.refresh_session().await }
    });
    let renew = Action::new_local(move |_: &()| {
        let store = auth.store();
        async move { store.renew_tokens().await }
    });

    Effect::new(move |_| {
        if renew.value().get() == Some(true) {
            set_notice.set(Some("Session tokens renewed.".to_string()));
        }
    });

    let busy = Signal::derive(move || reload.pending().get() || renew.pending().get());

    view! {
        <AppShell>
            <ProtectedRoute>
                <div class="max-w-lg mx-auto space-y-6">
                    <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">"Account"</h1>
                    {move || auth.user.get().map(profile)}
                    <div class="flex flex-col gap-3 sm:flex-row">
                        <Button
                            secondary=true
                            disabled=busy
                            on_click=Callback::new(move |()| {
                                set_notice.set(None);
                                reload.dispatch(());
                            })
                        >
                            "Reload profile"
                        </Button>
                        <Button
                            secondary=true
                            disabled=busy
                            on_click=Callback::new(move |()| {
                                set_notice.set(None);
                                renew.dispatch(());
                            })
                        >
                            "Renew session"
                        </Button>
                    </div>
                    {move || notice.get().map(|message| view! { <Alert kind=AlertKind::Info message=message /> })}
                    {move || auth.error.get().map(|message| view! { <Alert kind=AlertKind::Error message=message /> })}
                </div>
            </ProtectedRoute>
        </AppShell>
    }
}

fn profile(user: User) -> impl IntoView {
    let role = user.role.map_or("none", |role| role.as_str());
    let verified = if user.is_verified.unwrap_or(false) {
        "Verified"
    } else {
        "Not verified"
    };

    view! {
        <dl class="divide-y divide-gray-200 rounded-lg border border-gray-200 dark:divide-gray-700 dark:border-gray-700">
            <ProfileRow label="Name" value=user.name />
            <ProfileRow label="Email" value=user.email />
            <ProfileRow label="Role" value=role.to_string() />
            <ProfileRow label="Status" value=verified.to_string() />
        </dl>
    }
}

#[component]
fn ProfileRow(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="flex justify-between px-4 py-3 text-sm">
            <dt class="text-gray-500 dark:text-gray-400">{label}</dt>
            <dd class="font-medium text-gray-900 dark:text-white">{value}</dd>
        </div>
    }
}
