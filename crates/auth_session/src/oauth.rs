//! Google sign-in, second phase: consuming the redirect the backend sends to
//! `/auth/google/callback?access_token=..&refresh_token=..`.
//!
//! `Pending -> Succeeded | Failed`. There is no retry; a failed callback
//! always lands back on the login route after a short delay.

use crate::guard::{HOME_ROUTE, LOGIN_ROUTE};
use crate::model::TokenPair;
use crate::storage::{KeyValueStorage, TokenStore};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

pub const CALLBACK_PATH: &str = "/auth/google/callback";
pub const FAILURE_REDIRECT_DELAY: Duration = Duration::from_secs(2);
pub const MISSING_TOKENS_MESSAGE: &str = "Login failed: no credentials were received";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackState {
    Pending,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Tokens are stored; the session must be re-read before landing here.
    Success { redirect_to: &'static str },
    Failed {
        message: String,
        redirect_to: &'static str,
        delay: Duration,
    },
}

impl CallbackOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            redirect_to: LOGIN_ROUTE,
            delay: FAILURE_REDIRECT_DELAY,
        }
    }

    #[must_use]
    pub fn state(&self) -> CallbackState {
        match self {
            Self::Success { .. } => CallbackState::Succeeded,
            Self::Failed { message, .. } => CallbackState::Failed(message.clone()),
        }
    }
}

/// A callback that has been received but not yet committed to storage.
pub struct OAuthCallback {
    tokens: Option<TokenPair>,
}

impl OAuthCallback {
    /// Reads the token pair from a query string (with or without the leading
    /// `?`). Empty values count as missing.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut access = None;
        let mut refresh = None;

        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "access_token" => access = Some(value.into_owned()),
                "refresh_token" => refresh = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            tokens: access
                .zip(refresh)
                .map(|(access, refresh)| TokenPair::new(access, refresh)),
        }
    }

    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    #[must_use]
    pub const fn state(&self) -> CallbackState {
        CallbackState::Pending
    }

    #[must_use]
    pub const fn has_tokens(&self) -> bool {
        self.tokens.is_some()
    }

    /// Commits the pair to storage. Nothing is written unless both tokens are
    /// present; a storage failure is reported as a failed login.
    pub fn complete<S: KeyValueStorage>(self, store: &TokenStore<S>) -> CallbackOutcome {
        let Some(pair) = self.tokens else {
            warn!("OAuth callback arrived without a complete token pair");
            return CallbackOutcome::failed(MISSING_TOKENS_MESSAGE);
        };

        match store.persist(&pair) {
            Ok(()) => {
                info!("OAuth callback stored session tokens");
                CallbackOutcome::Success {
                    redirect_to: HOME_ROUTE,
                }
            }
            Err(err) => {
                warn!("failed to store OAuth tokens: {err}");
                CallbackOutcome::failed(format!("Google login failed: {err}"))
            }
        }
    }
}

impl fmt::Debug for OAuthCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCallback")
            .field("has_tokens", &self.has_tokens())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
    use crate::test_support::FlakyStorage;

    #[test]
    fn both_tokens_are_persisted() {
        let store = TokenStore::new(MemoryStorage::new());
        let callback = OAuthCallback::from_query("?access_token=a1&refresh_token=r1");
        assert_eq!(callback.state(), CallbackState::Pending);

        let outcome = callback.complete(&store);

        assert_eq!(outcome, CallbackOutcome::Success { redirect_to: "/" });
        assert_eq!(outcome.state(), CallbackState::Succeeded);
        assert_eq!(
            store.storage().get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
            Some("a1")
        );
        assert_eq!(
            store.storage().get(REFRESH_TOKEN_KEY).unwrap().as_deref(),
            Some("r1")
        );
    }

    #[test]
    fn access_token_alone_fails_without_writing() {
        let store = TokenStore::new(MemoryStorage::new());

        let outcome = OAuthCallback::from_query("access_token=a1").complete(&store);

        assert_eq!(
            outcome,
            CallbackOutcome::Failed {
                message: MISSING_TOKENS_MESSAGE.to_string(),
                redirect_to: "/login",
                delay: Duration::from_secs(2),
            }
        );
        assert!(store.storage().is_empty());
    }

    #[test]
    fn empty_values_count_as_missing() {
        let callback = OAuthCallback::from_query("access_token=&refresh_token=r1");
        assert!(!callback.has_tokens());
    }

    #[test]
    fn tokens_are_read_from_full_url() {
        let url =
            Url::parse("https://vortixpr.com/auth/google/callback?refresh_token=r%2B1&access_token=a1")
                .unwrap();
        let store = TokenStore::new(MemoryStorage::new());

        OAuthCallback::from_url(&url).complete(&store);

        assert_eq!(
            store.storage().get(REFRESH_TOKEN_KEY).unwrap().as_deref(),
            Some("r+1")
        );
    }

    #[test]
    fn storage_failure_is_a_failed_login() {
        let storage = FlakyStorage::failing_writes_for(ACCESS_TOKEN_KEY);
        let store = TokenStore::new(&storage);

        let outcome = OAuthCallback::from_query("access_token=a1&refresh_token=r1").complete(&store);

        match outcome {
            CallbackOutcome::Failed {
                message,
                redirect_to,
                ..
            } => {
                assert!(message.contains("quota exceeded"));
                assert_eq!(redirect_to, "/login");
            }
            CallbackOutcome::Success { .. } => panic!("storage failure must fail the callback"),
        }
        assert!(storage.inner.is_empty());
    }

    #[test]
    fn debug_hides_tokens() {
        let callback = OAuthCallback::from_query("access_token=secret-a&refresh_token=secret-r");
        assert!(!format!("{callback:?}").contains("secret"));
    }
}
