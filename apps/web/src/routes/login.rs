//! Login and registration. An `?invitation=` link opens the page in
//! registration mode with the invited email pre-filled; `?from=` carries the
//! location a guard bounced the user from.

use crate::components::{
    Alert, AlertKind, AlreadySignedInPanel, AppShell, Button, Spinner,
};
use crate::features::auth::state::use_auth;
use auth_session::guard::{post_login_destination, RETURN_PARAM};
use auth_session::InvitationInfo;
use leptos::ev::SubmitEvent;
use leptos::{prelude::*, task::spawn_local};
use leptos_router::hooks::{use_navigate, use_query_map};

const INVITATION_PARAM: &str = "invitation";

const INPUT_CLASS: &str = "bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white";
const LABEL_CLASS: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

#[derive(Clone)]
enum Submission {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        name: String,
        invitation: Option<String>,
    },
    Demo,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let query = use_query_map();

    let invitation = query.with_untracked(|params| {
        params
            .get(INVITATION_PARAM)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    });
    let from = query.with_untracked(|params| params.get(RETURN_PARAM));

    let initial_mode = if invitation.is_some() {
        Mode::Register
    } else {
        Mode::Login
    };
    let (mode, set_mode) = signal(initial_mode);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (name, set_name) = signal(String::new());
    let (form_error, set_form_error) = signal::<Option<String>>(None);
    let (invited, set_invited) = signal::<Option<InvitationInfo>>(None);

    if let Some(token) = invitation.clone() {
        spawn_local(async move {
            if let Some(info) = auth.store().lookup_invitation(&token).await {
                set_email.set(info.email.clone());
                set_invited.set(Some(info));
            }
        });
    }

    let submit_action = Action::new_local(move |submission: &Submission| {
        let submission = submission.clone();
        let store = auth.store();
        async move {
            match submission {
                Submission::Login { email, password } => store.login(&email, &password).await,
                Submission::Register {
                    email,
                    password,
                    name,
                    invitation,
                } => {
                    store
                        .register(&email, &password, &name, invitation.as_deref())
                        .await
                }
                Submission::Demo => store.quick_login().await,
            }
        }
    });

    let destination = post_login_destination(from.as_deref());
    Effect::new(move |_| {
        if submit_action.value().get() == Some(true) {
            navigate(&destination, Default::default());
        }
    });

    let invitation = StoredValue::new(invitation);
    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        set_form_error.set(None);
        auth.clear_error();

        let email_value = email.get_untracked().trim().to_string();
        let password_value = password.get_untracked();
        if email_value.is_empty() || password_value.trim().is_empty() {
            set_form_error.set(Some("Email and password are required.".to_string()));
            return;
        }

        let submission = match mode.get_untracked() {
            Mode::Login => Submission::Login {
                email: email_value,
                password: password_value,
            },
            Mode::Register => {
                let name_value = name.get_untracked().trim().to_string();
                if name_value.is_empty() {
                    set_form_error.set(Some("Please enter your name.".to_string()));
                    return;
                }
                Submission::Register {
                    email: email_value,
                    password: password_value,
                    name: name_value,
                    invitation: invitation.get_value(),
                }
            }
        };
        submit_action.dispatch(submission);
    };

    let on_google = move |()| {
        spawn_local(async move {
            let store = auth.store();
            let Some(url) = store.login_with_google().await else {
                return;
            };
            let navigated = web_sys::window()
                .ok_or_else(|| "no browser window".to_string())
                .and_then(|window| {
                    window
                        .location()
                        .set_href(&url)
                        .map_err(|err| format!("{err:?}"))
                });
            if let Err(err) = navigated {
                store.report_error(format!("Google login failed: {err}"));
            }
        });
    };

    let toggle_mode = move |_| {
        set_form_error.set(None);
        auth.clear_error();
        set_mode.update(|mode| {
            *mode = match mode {
                Mode::Login => Mode::Register,
                Mode::Register => Mode::Login,
            }
        });
    };

    let shown_error = move || form_error.get().or_else(|| auth.error.get());
    let busy = Signal::derive(move || submit_action.pending().get());

    view! {
        <AppShell>
            <Show
                when=move || !auth.is_authenticated.get() || busy.get()
                fallback=|| view! { <AlreadySignedInPanel /> }
            >
                <div class="max-w-sm mx-auto space-y-5">
                    {move || {
                        invited
                            .get()
                            .map(|info| {
                                let inviter = info
                                    .inviter_name
                                    .clone()
                                    .or_else(|| info.inviter_email.clone())
                                    .unwrap_or_else(|| "A team member".to_string());
                                view! {
                                    <Alert
                                        kind=AlertKind::Info
                                        message=format!(
                                            "{inviter} invited you to join VortixPR as {}.",
                                            info.role,
                                        )
                                    />
                                }
                            })
                    }}
                    <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">
                        {move || match mode.get() {
                            Mode::Login => "Welcome Back",
                            Mode::Register => "Join VortixPR",
                        }}
                    </h1>
                    <form class="space-y-5" on:submit=on_submit>
                        <Show when=move || mode.get() == Mode::Register>
                            <div>
                                <label class=LABEL_CLASS for="name">"Full Name"</label>
                                <input
                                    id="name"
                                    type="text"
                                    class=INPUT_CLASS
                                    autocomplete="name"
                                    prop:value=move || name.get()
                                    on:input=move |event| set_name.set(event_target_value(&event))
                                />
                            </div>
                        </Show>
                        <div>
                            <label class=LABEL_CLASS for="email">"Email"</label>
                            <input
                                id="email"
                                type="email"
                                class=INPUT_CLASS
                                autocomplete="email"
                                placeholder="name@company.com"
                                required
                                prop:value=move || email.get()
                                on:input=move |event| set_email.set(event_target_value(&event))
                            />
                        </div>
                        <div>
                            <label class=LABEL_CLASS for="password">"Password"</label>
                            <input
                                id="password"
                                type="password"
                                class=INPUT_CLASS
                                autocomplete=move || match mode.get() {
                                    Mode::Login => "current-password",
                                    Mode::Register => "new-password",
                                }
                                required
                                on:input=move |event| set_password.set(event_target_value(&event))
                            />
                        </div>
                        <Button button_type="submit" disabled=busy>
                            {move || match mode.get() {
                                Mode::Login => "Sign In",
                                Mode::Register => "Create Account",
                            }}
                        </Button>
                    </form>
                    <Button secondary=true disabled=busy on_click=Callback::new(on_google)>
                        "Continue with Google"
                    </Button>
                    <Button
                        secondary=true
                        disabled=busy
                        on_click=Callback::new(move |()| {
                            auth.clear_error();
                            submit_action.dispatch(Submission::Demo);
                        })
                    >
                        "Quick demo login"
                    </Button>
                    <button
                        type="button"
                        class="text-sm text-blue-700 hover:underline dark:text-blue-400"
                        on:click=toggle_mode
                    >
                        {move || match mode.get() {
                            Mode::Login => "Don't have an account? Sign up",
                            Mode::Register => "Already have an account? Sign in",
                        }}
                    </button>
                    {move || busy.get().then_some(view! { <div><Spinner /></div> })}
                    {move || {
                        shown_error()
                            .map(|message| view! { <Alert kind=AlertKind::Error message=message /> })
                    }}
                </div>
            </Show>
        </AppShell>
    }
}
