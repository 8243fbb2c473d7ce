//! Session store: owns the authentication lifecycle and exposes the reactive
//! snapshot (`user`, `is_loading`, `error`) that views and guards read.
//!
//! Every operation reports failure through its return value and the `error`
//! field; nothing propagates past the store. Overlapping calls are not
//! de-duplicated and in-flight requests cannot be cancelled.

use crate::api::{ApiError, AuthApi};
use crate::model::{Credentials, InvitationInfo, Registration, TokenResponse, User};
use crate::storage::{KeyValueStorage, TokenStore};
use std::cell::RefCell;
use tracing::{debug, info, warn};

pub const DEMO_EMAIL: &str = "demo@vortixstream.com";
pub const DEMO_PASSWORD: &str = "demo123";

const LOGIN_FAILED: &str = "Login failed";
const REGISTER_FAILED: &str = "Registration failed";
const GOOGLE_LOGIN_FAILED: &str = "Google login failed";
const INVITATION_FAILED: &str = "Invitation lookup failed";

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    /// A fresh session is loading until the stored token has been checked.
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
            error: None,
        }
    }
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

type Listener = Box<dyn Fn(&SessionState)>;

pub struct SessionStore<A, S> {
    api: A,
    tokens: TokenStore<S>,
    state: RefCell<SessionState>,
    listener: Option<Listener>,
}

impl<A: AuthApi, S: KeyValueStorage> SessionStore<A, S> {
    pub fn new(api: A, storage: S) -> Self {
        Self {
            api,
            tokens: TokenStore::new(storage),
            state: RefCell::new(SessionState::default()),
            listener: None,
        }
    }

    /// Registers a callback that receives the snapshot after every change.
    #[must_use]
    pub fn with_listener(mut self, listener: impl Fn(&SessionState) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Restores the session from the stored access token. A token the backend
    /// does not accept, for any reason, purges both stored tokens.
    pub async fn initialize(&self) {
        let Some(token) = self.stored_access_token() else {
            self.update(|state| {
                state.user = None;
                state.is_loading = false;
            });
            return;
        };

        match self.api.fetch_me(&token).await {
            Ok(user) => {
                debug!(user_id = user.id, "session restored");
                self.update(|state| {
                    state.user = Some(user.into());
                    state.is_loading = false;
                });
            }
            Err(err) => {
                debug!("stored access token rejected, purging session: {err}");
                self.purge_tokens();
                self.update(|state| {
                    state.user = None;
                    state.is_loading = false;
                });
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.begin();
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.api.login(&credentials).await;
        self.finish_exchange(result, LOGIN_FAILED)
    }

    /// Same contract as [`Self::login`]; the invitation token is forwarded so
    /// the backend can bind the account to its pre-assigned role.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        invitation_token: Option<&str>,
    ) -> bool {
        self.begin();
        let registration = Registration {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        let result = self.api.register(&registration, invitation_token).await;
        self.finish_exchange(result, REGISTER_FAILED)
    }

    /// Drops the session locally. No network call is made.
    pub fn logout(&self) {
        self.purge_tokens();
        self.update(|state| {
            state.user = None;
            state.error = None;
        });
        info!("logged out");
    }

    /// Fetches the Google authorization URL. The caller performs the full
    /// navigation; the backend later redirects to the OAuth callback.
    pub async fn login_with_google(&self) -> Option<String> {
        match self.api.google_login_url().await {
            Ok(response) => Some(response.url),
            Err(err) => {
                warn!("failed to obtain Google login URL: {err}");
                self.update(|state| state.error = Some(err.user_message(GOOGLE_LOGIN_FAILED)));
                None
            }
        }
    }

    /// Demo affordance: logs in with the fixed demo account.
    pub async fn quick_login(&self) -> bool {
        self.login(DEMO_EMAIL, DEMO_PASSWORD).await
    }

    /// Re-fetches the identity. Only a 401/403 logs out; transport, validation
    /// and server failures keep the tokens so the session can recover.
    pub async fn refresh_session(&self) {
        let Some(token) = self.stored_access_token() else {
            self.update(|state| state.user = None);
            return;
        };

        match self.api.fetch_me(&token).await {
            Ok(user) => self.update(|state| state.user = Some(user.into())),
            Err(err) if err.is_rejection() => {
                debug!("access token rejected on refresh: {err}");
                self.logout();
            }
            Err(err) => {
                warn!("identity refresh failed, keeping tokens: {err}");
                self.update(|state| state.user = None);
            }
        }
    }

    /// Re-reads storage after another writer (another tab, the OAuth callback)
    /// changed it. Never purges tokens.
    pub async fn sync_from_storage(&self) {
        let Some(token) = self.stored_access_token() else {
            self.update(|state| {
                state.user = None;
                state.is_loading = false;
            });
            return;
        };

        let result = self.api.fetch_me(&token).await;
        self.update(|state| {
            state.is_loading = false;
            state.user = match result {
                Ok(user) => Some(user.into()),
                Err(err) => {
                    warn!("failed to sync session from storage: {err}");
                    None
                }
            };
        });
    }

    /// Exchanges the stored refresh token for a new pair. A refresh token the
    /// backend refuses (401/403) purges the session; any other failure keeps it.
    pub async fn renew_tokens(&self) -> bool {
        let refresh = match self.tokens.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => return false,
            Err(err) => {
                warn!("failed to read refresh token: {err}");
                return false;
            }
        };

        match self.api.refresh(&refresh).await {
            Ok(response) => {
                let (pair, user) = response.into_parts();
                if let Err(err) = self.tokens.persist(&pair) {
                    warn!("failed to store renewed tokens: {err}");
                    return false;
                }
                self.update(|state| state.user = Some(user));
                true
            }
            Err(err) if err.is_rejection() => {
                debug!("refresh token rejected: {err}");
                self.logout();
                false
            }
            Err(err) => {
                warn!("token renewal failed, keeping tokens: {err}");
                false
            }
        }
    }

    /// Looks up a pending invitation so registration can be pre-filled.
    pub async fn lookup_invitation(&self, token: &str) -> Option<InvitationInfo> {
        match self.api.invitation(token).await {
            Ok(info) => Some(info),
            Err(err) => {
                self.update(|state| state.error = Some(err.user_message(INVITATION_FAILED)));
                None
            }
        }
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    /// Records a failure that happened outside the store, such as the browser
    /// refusing to navigate to the Google authorization page.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|state| state.error = Some(message));
    }

    fn begin(&self) {
        self.update(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    fn finish_exchange(&self, result: Result<TokenResponse, ApiError>, fallback: &str) -> bool {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                debug!("credential exchange failed: {err}");
                self.update(|state| {
                    state.error = Some(err.user_message(fallback));
                    state.is_loading = false;
                });
                return false;
            }
        };

        let (pair, user) = response.into_parts();
        if let Err(err) = self.tokens.persist(&pair) {
            warn!("failed to store tokens: {err}");
            self.update(|state| {
                state.error = Some(err.to_string());
                state.is_loading = false;
            });
            return false;
        }

        info!(user_id = user.id, "authenticated");
        self.update(|state| {
            state.user = Some(user);
            state.error = None;
            state.is_loading = false;
        });
        true
    }

    fn stored_access_token(&self) -> Option<secrecy::SecretString> {
        match self.tokens.access_token() {
            Ok(token) => token,
            Err(err) => {
                warn!("failed to read access token: {err}");
                None
            }
        }
    }

    fn purge_tokens(&self) {
        if let Err(err) = self.tokens.clear() {
            warn!("failed to clear stored tokens: {err}");
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) {
        apply(&mut self.state.borrow_mut());
        if let Some(listener) = &self.listener {
            let snapshot = self.state();
            listener(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;
    use crate::storage::{MemoryStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
    use crate::test_support::{api_user, FakeApi, FlakyStorage, PASSWORD};
    use std::rc::Rc;

    fn new_store(api: FakeApi) -> (SessionStore<FakeApi, Rc<MemoryStorage>>, Rc<MemoryStorage>) {
        let storage = Rc::new(MemoryStorage::new());
        (SessionStore::new(api, Rc::clone(&storage)), storage)
    }

    #[test]
    fn fresh_store_is_loading_and_anonymous() {
        let (store, _) = new_store(FakeApi::default());
        let state = store.state();
        assert!(state.is_loading);
        assert!(!state.is_authenticated());
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn initialize_without_token_stops_loading() {
        let (store, _) = new_store(FakeApi::with_account(UserRole::User));
        store.initialize().await;
        assert!(!store.is_loading());
        assert_eq!(store.user(), None);
        assert!(store.api().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn initialize_restores_user_from_stored_token() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::Admin));
        storage.set(ACCESS_TOKEN_KEY, "access:a@b.com").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "refresh:a@b.com").unwrap();

        store.initialize().await;

        let user = store.user().unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.role, Some(UserRole::Admin));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn initialize_with_invalid_token_purges_both_tokens() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::User));
        storage.set(ACCESS_TOKEN_KEY, "stale").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "stale-refresh").unwrap();

        store.initialize().await;

        assert_eq!(store.user(), None);
        assert!(!storage.contains(ACCESS_TOKEN_KEY));
        assert!(!storage.contains(REFRESH_TOKEN_KEY));
        assert_eq!(store.error(), None);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn initialize_purges_tokens_on_network_failure() {
        let (store, storage) = new_store(FakeApi::offline());
        storage.set(ACCESS_TOKEN_KEY, "access:a@b.com").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "refresh:a@b.com").unwrap();

        store.initialize().await;

        assert_eq!(store.user(), None);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn login_with_correct_credentials_authenticates() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::User));

        for _ in 0..2 {
            assert!(store.login("a@b.com", PASSWORD).await);
            assert!(store.is_authenticated());
            assert_eq!(store.error(), None);
            assert!(!store.is_loading());
        }

        assert_eq!(
            storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
            Some("access:a@b.com")
        );
        assert_eq!(
            storage.get(REFRESH_TOKEN_KEY).unwrap().as_deref(),
            Some("refresh:a@b.com")
        );
    }

    #[tokio::test]
    async fn login_with_wrong_password_reports_error() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::User));

        for _ in 0..2 {
            assert!(!store.login("a@b.com", "wrong").await);
            assert_eq!(store.user(), None);
            assert!(!store.is_authenticated());
            assert_eq!(store.error().as_deref(), Some("Invalid email or password"));
            assert!(!store.is_loading());
        }
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn login_network_failure_reports_non_empty_error() {
        let (store, _) = new_store(FakeApi::offline());
        assert!(!store.login("a@b.com", PASSWORD).await);
        let error = store.error().unwrap();
        assert!(error.contains("connection refused"));
    }

    #[tokio::test]
    async fn login_clears_previous_error() {
        let (store, _) = new_store(FakeApi::with_account(UserRole::User));
        assert!(!store.login("a@b.com", "wrong").await);
        assert!(store.error().is_some());
        assert!(store.login("a@b.com", PASSWORD).await);
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn login_storage_failure_is_a_failed_login() {
        let storage = FlakyStorage::failing_writes_for(REFRESH_TOKEN_KEY);
        let store = SessionStore::new(FakeApi::with_account(UserRole::User), &storage);

        assert!(!store.login("a@b.com", PASSWORD).await);
        assert_eq!(store.user(), None);
        assert!(store.error().is_some());
        assert!(storage.inner.is_empty());
    }

    #[tokio::test]
    async fn register_populates_session_and_storage() {
        let (store, storage) = new_store(FakeApi::default());

        assert!(store.register("a@b.com", "pw123456", "Ann", None).await);

        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("access:a@b.com"));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("refresh:a@b.com"));
        let user = store.user().unwrap();
        assert_eq!(user.name, "Ann");
        assert_eq!(user.role, Some(UserRole::User));
        assert_eq!(user.is_verified, Some(false));
    }

    #[tokio::test]
    async fn register_forwards_invitation_token() {
        let (store, _) = new_store(FakeApi::default());

        assert!(store.register("new@b.com", PASSWORD, "New", Some("invite-1")).await);

        assert_eq!(
            store.api().last_invitation.borrow().as_deref(),
            Some("invite-1")
        );
        assert_eq!(store.user().unwrap().role, Some(UserRole::Admin));
    }

    #[tokio::test]
    async fn register_duplicate_email_fails() {
        let (store, _) = new_store(FakeApi::with_account(UserRole::User));
        assert!(!store.register("a@b.com", PASSWORD, "Ann", None).await);
        assert_eq!(store.error().as_deref(), Some("Email already registered"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn logout_clears_everything_regardless_of_state() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::User));
        store.logout();
        assert_eq!(store.user(), None);
        assert!(storage.is_empty());

        assert!(store.login("a@b.com", PASSWORD).await);
        store.logout();
        assert_eq!(store.user(), None);
        assert!(!storage.contains(ACCESS_TOKEN_KEY));
        assert!(!storage.contains(REFRESH_TOKEN_KEY));
    }

    #[tokio::test]
    async fn quick_login_uses_demo_credentials() {
        let (store, _) = new_store(FakeApi::default());
        assert!(!store.quick_login().await);

        let api = FakeApi::default();
        api.accounts.borrow_mut().push((
            api_user(9, "Demo", DEMO_EMAIL, UserRole::User),
            DEMO_PASSWORD.to_string(),
        ));
        let (store, storage) = new_store(api);

        assert!(store.quick_login().await);
        assert_eq!(store.user().unwrap().email, DEMO_EMAIL);
        assert_eq!(
            storage.get(ACCESS_TOKEN_KEY).unwrap(),
            Some(format!("access:{DEMO_EMAIL}"))
        );
    }

    #[tokio::test]
    async fn google_login_returns_authorization_url() {
        let api = FakeApi {
            google_url: Some("https://accounts.google.com/o/oauth2/v2/auth?x=1".to_string()),
            ..FakeApi::default()
        };
        let (store, _) = new_store(api);
        assert_eq!(
            store.login_with_google().await.as_deref(),
            Some("https://accounts.google.com/o/oauth2/v2/auth?x=1")
        );
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn google_login_failure_sets_error() {
        let (store, _) = new_store(FakeApi::default());
        assert_eq!(store.login_with_google().await, None);
        assert_eq!(store.error().as_deref(), Some("Google OAuth is not configured"));
    }

    #[tokio::test]
    async fn refresh_session_keeps_tokens_when_offline() {
        let (store, storage) = new_store(FakeApi::offline());
        storage.set(ACCESS_TOKEN_KEY, "access:a@b.com").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "refresh:a@b.com").unwrap();

        store.refresh_session().await;

        assert_eq!(store.user(), None);
        assert!(storage.contains(ACCESS_TOKEN_KEY));
        assert!(storage.contains(REFRESH_TOKEN_KEY));
    }

    #[tokio::test]
    async fn refresh_session_logs_out_on_rejection() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::User));
        storage.set(ACCESS_TOKEN_KEY, "revoked").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "revoked").unwrap();

        store.refresh_session().await;

        assert_eq!(store.user(), None);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn refresh_session_keeps_tokens_on_server_error() {
        let api = FakeApi::with_account(UserRole::User);
        *api.failure.borrow_mut() = Some(500);
        let (store, storage) = new_store(api);
        storage.set(ACCESS_TOKEN_KEY, "access:a@b.com").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "refresh:a@b.com").unwrap();

        store.refresh_session().await;

        assert_eq!(store.user(), None);
        assert!(storage.contains(ACCESS_TOKEN_KEY));
        assert!(storage.contains(REFRESH_TOKEN_KEY));
    }

    #[tokio::test]
    async fn renew_tokens_keeps_pair_on_validation_error() {
        let api = FakeApi::with_account(UserRole::User);
        *api.failure.borrow_mut() = Some(422);
        let (store, storage) = new_store(api);
        storage.set(ACCESS_TOKEN_KEY, "access:a@b.com").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "refresh:a@b.com").unwrap();

        assert!(!store.renew_tokens().await);

        assert_eq!(
            storage.get(REFRESH_TOKEN_KEY).unwrap().as_deref(),
            Some("refresh:a@b.com")
        );
        assert!(storage.contains(ACCESS_TOKEN_KEY));
    }

    #[test]
    fn reported_error_is_visible_until_cleared() {
        let (store, _) = new_store(FakeApi::default());

        store.report_error("Google login failed: navigation blocked");
        assert_eq!(
            store.error().as_deref(),
            Some("Google login failed: navigation blocked")
        );

        store.clear_error();
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn sync_from_storage_never_purges_tokens() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::User));
        storage.set(ACCESS_TOKEN_KEY, "unknown").unwrap();

        store.sync_from_storage().await;
        assert_eq!(store.user(), None);
        assert!(storage.contains(ACCESS_TOKEN_KEY));

        storage.set(ACCESS_TOKEN_KEY, "access:a@b.com").unwrap();
        store.sync_from_storage().await;
        assert_eq!(store.user().unwrap().email, "a@b.com");

        storage.remove(ACCESS_TOKEN_KEY).unwrap();
        store.sync_from_storage().await;
        assert_eq!(store.user(), None);
    }

    #[tokio::test]
    async fn renew_tokens_rotates_pair() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::User));
        storage.set(ACCESS_TOKEN_KEY, "expired").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "refresh:a@b.com").unwrap();

        assert!(store.renew_tokens().await);
        assert_eq!(
            storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
            Some("access:a@b.com")
        );
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn renew_tokens_without_refresh_token_is_noop() {
        let (store, _) = new_store(FakeApi::with_account(UserRole::User));
        assert!(!store.renew_tokens().await);
        assert!(store.api().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn renew_tokens_rejected_purges_session() {
        let (store, storage) = new_store(FakeApi::with_account(UserRole::User));
        storage.set(ACCESS_TOKEN_KEY, "expired").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "forged").unwrap();

        assert!(!store.renew_tokens().await);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn renew_tokens_offline_keeps_pair() {
        let (store, storage) = new_store(FakeApi::offline());
        storage.set(ACCESS_TOKEN_KEY, "expired").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "refresh:a@b.com").unwrap();

        assert!(!store.renew_tokens().await);
        assert!(storage.contains(REFRESH_TOKEN_KEY));
    }

    #[tokio::test]
    async fn lookup_invitation_reports_missing_invitation() {
        let (store, _) = new_store(FakeApi::default());
        let info = store.lookup_invitation("invite-1").await.unwrap();
        assert_eq!(info.email, "new@b.com");

        assert_eq!(store.lookup_invitation("nope").await, None);
        assert_eq!(
            store.error().as_deref(),
            Some("Invitation not found or no longer valid")
        );
        store.clear_error();
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn listener_sees_loading_then_result() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let store = SessionStore::new(FakeApi::with_account(UserRole::User), MemoryStorage::new())
            .with_listener(move |state| sink.borrow_mut().push(state.clone()));

        assert!(store.login("a@b.com", PASSWORD).await);

        let seen = seen.borrow();
        assert!(seen.first().unwrap().is_loading);
        let last = seen.last().unwrap();
        assert!(!last.is_loading);
        assert!(last.is_authenticated());
    }
}
