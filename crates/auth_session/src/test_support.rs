use crate::api::{ApiError, AuthApi};
use crate::model::{
    ApiUser, Credentials, GoogleLoginUrl, InvitationInfo, Registration, TokenResponse, UserRole,
};
use crate::storage::{KeyValueStorage, MemoryStorage, StorageError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::cell::RefCell;

pub const PASSWORD: &str = "pw123456";

/// Memory storage that fails writes or removals for one key.
#[derive(Default)]
pub struct FlakyStorage {
    pub inner: MemoryStorage,
    fail_write: Option<&'static str>,
    fail_remove: Option<&'static str>,
}

impl FlakyStorage {
    pub fn failing_writes_for(key: &'static str) -> Self {
        Self {
            fail_write: Some(key),
            ..Self::default()
        }
    }

    pub fn failing_removals_for(key: &'static str) -> Self {
        Self {
            fail_remove: Some(key),
            ..Self::default()
        }
    }
}

impl KeyValueStorage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_write == Some(key) {
            return Err(StorageError::Write("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_remove == Some(key) {
            return Err(StorageError::Write("locked".to_string()));
        }
        self.inner.remove(key)
    }
}

pub fn api_user(id: i64, name: &str, email: &str, role: UserRole) -> ApiUser {
    ApiUser {
        id,
        name: name.to_string(),
        email: email.to_string(),
        avatar_url: None,
        role: Some(role),
        is_verified: Some(false),
        created_at: None,
    }
}

fn token_response(access: &str, refresh: &str, user: ApiUser) -> TokenResponse {
    TokenResponse {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        token_type: Some("bearer".to_string()),
        user,
    }
}

fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Http {
        status,
        message: message.to_string(),
    }
}

/// In-memory backend with one account per email.
#[derive(Default)]
pub struct FakeApi {
    pub accounts: RefCell<Vec<(ApiUser, String)>>,
    pub offline: bool,
    /// Status every call fails with, when set.
    pub failure: RefCell<Option<u16>>,
    pub google_url: Option<String>,
    pub calls: RefCell<Vec<String>>,
    pub last_invitation: RefCell<Option<String>>,
}

impl FakeApi {
    pub fn with_account(role: UserRole) -> Self {
        let api = Self::default();
        api.accounts
            .borrow_mut()
            .push((api_user(1, "Ann", "a@b.com", role), PASSWORD.to_string()));
        api
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn record(&self, call: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call.to_string());
        if self.offline {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        if let Some(status) = *self.failure.borrow() {
            return Err(rejected(status, "Service unavailable"));
        }
        Ok(())
    }

    fn account_for_token(&self, token: &str, prefix: &str) -> Option<ApiUser> {
        let email = token.strip_prefix(prefix)?;
        self.accounts
            .borrow()
            .iter()
            .find(|(user, _)| user.email == email)
            .map(|(user, _)| user.clone())
    }
}

#[async_trait(?Send)]
impl AuthApi for FakeApi {
    async fn fetch_me(&self, access_token: &SecretString) -> Result<ApiUser, ApiError> {
        self.record("me")?;
        self.account_for_token(access_token.expose_secret(), "access:")
            .ok_or_else(|| rejected(401, "Could not validate credentials"))
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        self.record("login")?;
        let known = self
            .accounts
            .borrow()
            .iter()
            .find(|(user, _)| user.email == credentials.email)
            .cloned();
        match known {
            Some((user, password)) if credentials.password == password => Ok(token_response(
                &format!("access:{}", user.email),
                &format!("refresh:{}", user.email),
                user,
            )),
            _ => Err(rejected(401, "Invalid email or password")),
        }
    }

    async fn register(
        &self,
        registration: &Registration,
        invitation_token: Option<&str>,
    ) -> Result<TokenResponse, ApiError> {
        self.record("register")?;
        *self.last_invitation.borrow_mut() = invitation_token.map(str::to_string);
        if self
            .accounts
            .borrow()
            .iter()
            .any(|(user, _)| user.email == registration.email)
        {
            return Err(rejected(400, "Email already registered"));
        }
        let role = if invitation_token.is_some() {
            UserRole::Admin
        } else {
            UserRole::User
        };
        let id = i64::try_from(self.accounts.borrow().len()).unwrap_or(0) + 1;
        let user = api_user(id, &registration.name, &registration.email, role);
        self.accounts
            .borrow_mut()
            .push((user.clone(), registration.password.clone()));
        Ok(token_response(
            &format!("access:{}", user.email),
            &format!("refresh:{}", user.email),
            user,
        ))
    }

    async fn google_login_url(&self) -> Result<GoogleLoginUrl, ApiError> {
        self.record("google")?;
        self.google_url
            .clone()
            .map(|url| GoogleLoginUrl { url })
            .ok_or_else(|| rejected(501, "Google OAuth is not configured"))
    }

    async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenResponse, ApiError> {
        self.record("refresh")?;
        let user = self
            .account_for_token(refresh_token.expose_secret(), "refresh:")
            .ok_or_else(|| rejected(401, "Invalid refresh token"))?;
        Ok(token_response(
            &format!("access:{}", user.email),
            &format!("refresh:{}", user.email),
            user,
        ))
    }

    async fn invitation(&self, token: &str) -> Result<InvitationInfo, ApiError> {
        self.record("invitation")?;
        if token == "invite-1" {
            Ok(InvitationInfo {
                email: "new@b.com".to_string(),
                role: UserRole::Admin,
                inviter_email: Some("a@b.com".to_string()),
                inviter_name: Some("Ann".to_string()),
                expires_at: "2030-01-01T00:00:00".to_string(),
            })
        } else {
            Err(rejected(404, "Invitation not found or no longer valid"))
        }
    }
}
