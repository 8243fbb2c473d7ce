use crate::cli::globals::GlobalArgs;
use crate::client::HttpAuthApi;
use crate::storage::FileStorage;
use anyhow::{anyhow, bail, Result};
use auth_session::guard::{self, GuardOptions, GuardOutcome};
use auth_session::{
    AuthApi, CallbackOutcome, KeyValueStorage, OAuthCallback, SessionStore, User,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

#[derive(Debug)]
pub enum Command {
    Login {
        email: String,
        password: SecretString,
    },
    Register {
        email: Option<String>,
        password: SecretString,
        name: String,
        invitation: Option<String>,
    },
    Logout,
    WhoAmI,
    GoogleUrl,
    Callback {
        url: Url,
    },
    QuickLogin,
    Refresh,
    Renew,
    Invitation {
        token: String,
    },
    Check {
        path: String,
        require_admin: bool,
    },
}

/// Execute a session command against the configured backend and session file.
/// # Errors
/// Returns an error if the client cannot be configured or the command fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!(api_url = %args.globals.api_url, store = %args.globals.store_path.display(), "session command");
    let api = HttpAuthApi::new(&args.globals.api_url)?;
    let storage = FileStorage::new(args.globals.store_path);
    let store = SessionStore::new(api, storage);

    let output = run(&store, args.command).await?;
    println!("{output}");
    Ok(())
}

/// Runs one command and returns the line to print.
/// # Errors
/// Returns the store's error message when the command fails.
pub async fn run<A: AuthApi, S: KeyValueStorage>(
    store: &SessionStore<A, S>,
    command: Command,
) -> Result<String> {
    match command {
        Command::Login { email, password } => {
            if !store.login(&email, password.expose_secret()).await {
                return Err(failure(store, "Login failed"));
            }
            signed_in(store)
        }
        Command::Register {
            email,
            password,
            name,
            invitation,
        } => {
            let email = match (email, invitation.as_deref()) {
                (Some(email), _) => email,
                (None, Some(token)) => {
                    let Some(info) = store.lookup_invitation(token).await else {
                        return Err(failure(store, "Invitation lookup failed"));
                    };
                    info!(role = %info.role, "registering from invitation");
                    info.email
                }
                (None, None) => bail!("an email or an invitation token is required"),
            };
            if !store
                .register(&email, password.expose_secret(), &name, invitation.as_deref())
                .await
            {
                return Err(failure(store, "Registration failed"));
            }
            signed_in(store)
        }
        Command::Logout => {
            store.logout();
            Ok("Signed out".to_string())
        }
        Command::WhoAmI => {
            store.initialize().await;
            Ok(current_user(store))
        }
        Command::GoogleUrl => store
            .login_with_google()
            .await
            .ok_or_else(|| failure(store, "Google login failed")),
        Command::Callback { url } => match OAuthCallback::from_url(&url).complete(store.tokens()) {
            CallbackOutcome::Success { .. } => {
                store.sync_from_storage().await;
                if store.is_authenticated() {
                    signed_in(store)
                } else {
                    Err(failure(store, "Google login failed"))
                }
            }
            CallbackOutcome::Failed { message, .. } => Err(anyhow!(message)),
        },
        Command::QuickLogin => {
            if !store.quick_login().await {
                return Err(failure(store, "Login failed"));
            }
            signed_in(store)
        }
        Command::Refresh => {
            store.refresh_session().await;
            Ok(current_user(store))
        }
        Command::Renew => {
            if !store.renew_tokens().await {
                bail!("Session could not be renewed");
            }
            Ok(format!("Tokens renewed. {}", current_user(store)))
        }
        Command::Invitation { token } => {
            let info = store
                .lookup_invitation(&token)
                .await
                .ok_or_else(|| failure(store, "Invitation lookup failed"))?;
            let inviter = info
                .inviter_name
                .as_deref()
                .or(info.inviter_email.as_deref())
                .unwrap_or("unknown");
            Ok(format!(
                "Invitation for {} as {} from {inviter}, expires {}",
                info.email, info.role, info.expires_at
            ))
        }
        Command::Check {
            path,
            require_admin,
        } => {
            store.initialize().await;
            let options = GuardOptions { require_admin };
            Ok(match guard::evaluate(&store.state(), options, &path) {
                GuardOutcome::Loading => "loading".to_string(),
                GuardOutcome::Redirect { from, .. } => {
                    format!("redirect {}", guard::login_href(&from))
                }
                GuardOutcome::Forbidden => "forbidden: Access Denied".to_string(),
                GuardOutcome::Render => format!("allow {path}"),
            })
        }
    }
}

fn describe(user: &User) -> String {
    let role = user.role.map_or("no role", |role| role.as_str());
    format!("{} <{}> ({role})", user.name, user.email)
}

fn signed_in<A: AuthApi, S: KeyValueStorage>(store: &SessionStore<A, S>) -> Result<String> {
    store
        .user()
        .map(|user| format!("Signed in as {}", describe(&user)))
        .ok_or_else(|| anyhow!("no user after sign-in"))
}

fn current_user<A: AuthApi, S: KeyValueStorage>(store: &SessionStore<A, S>) -> String {
    store
        .user()
        .map_or_else(|| "Not signed in".to_string(), |user| describe(&user))
}

fn failure<A: AuthApi, S: KeyValueStorage>(
    store: &SessionStore<A, S>,
    fallback: &str,
) -> anyhow::Error {
    anyhow!(store.error().unwrap_or_else(|| fallback.to_string()))
}
