//! Boundary to the VortixPR auth API. The session store only talks to the
//! backend through [`AuthApi`]; native and browser builds each supply their own
//! HTTP implementation on top of the shared paths and error mapping here.

use crate::model::{ApiUser, Credentials, GoogleLoginUrl, InvitationInfo, Registration, TokenResponse};
use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Maximum number of error body characters surfaced to the user.
pub const MAX_ERROR_CHARS: usize = 200;

pub mod paths {
    pub const ME: &str = "/auth/me";
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const GOOGLE_LOGIN: &str = "/auth/google/login";
    pub const REFRESH: &str = "/auth/refresh";
    pub const INVITATION: &str = "/auth/invitation";
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Backend-provided explanation, if the failure carried one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    /// True when the backend was never reached (or never answered).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }

    /// True when the backend refused the credential itself (401/403). Only
    /// these end a stored session; validation and server errors do not.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// Text shown to the user for a failed operation.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Http { .. } => self.detail().unwrap_or(fallback).to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Extracts a displayable message from an error response body. The backend
/// answers `{"detail": "..."}`; anything else is trimmed and truncated.
#[must_use]
pub fn error_message_from_body(body: &str) -> String {
    if let Ok(ErrorBody {
        detail: serde_json::Value::String(detail),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        return truncate(detail.trim());
    }

    truncate(body.trim())
}

fn truncate(value: &str) -> String {
    value.chars().take(MAX_ERROR_CHARS).collect()
}

/// Path for registration, carrying the invitation token when one is present.
#[must_use]
pub fn register_path(invitation_token: Option<&str>) -> String {
    match invitation_token.map(str::trim).filter(|token| !token.is_empty()) {
        Some(token) => format!(
            "{}?{}",
            paths::REGISTER,
            url::form_urlencoded::Serializer::new(String::new())
                .append_pair("invitation_token", token)
                .finish()
        ),
        None => paths::REGISTER.to_string(),
    }
}

/// Path for token renewal. The backend reads `refresh_token` from the query
/// string; clients send the JSON body as well.
#[must_use]
pub fn refresh_path(refresh_token: &str) -> String {
    format!(
        "{}?{}",
        paths::REFRESH,
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("refresh_token", refresh_token)
            .finish()
    )
}

/// Path for the public invitation lookup.
#[must_use]
pub fn invitation_path(token: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(token.trim().as_bytes()).collect();
    format!("{}/{encoded}", paths::INVITATION)
}

/// Credential exchange and identity endpoints consumed by the session store.
#[async_trait(?Send)]
pub trait AuthApi {
    /// Resolves the identity behind an access token. Fails on invalid or
    /// expired tokens.
    async fn fetch_me(&self, access_token: &SecretString) -> Result<ApiUser, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError>;

    /// The invitation token, when present, lets the backend bind the new
    /// account to a pre-assigned role and inviter.
    async fn register(
        &self,
        registration: &Registration,
        invitation_token: Option<&str>,
    ) -> Result<TokenResponse, ApiError>;

    async fn google_login_url(&self) -> Result<GoogleLoginUrl, ApiError>;

    async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenResponse, ApiError>;

    async fn invitation(&self, token: &str) -> Result<InvitationInfo, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_detail_is_extracted() {
        assert_eq!(
            error_message_from_body(r#"{"detail": " Invalid email or password "}"#),
            "Invalid email or password"
        );
    }

    #[test]
    fn non_string_detail_falls_back_to_raw_body() {
        let body = r#"{"detail":[{"loc":["body","email"]}]}"#;
        assert_eq!(error_message_from_body(body), body);
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(MAX_ERROR_CHARS + 50);
        assert_eq!(error_message_from_body(&body).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn refresh_path_carries_token_in_query() {
        assert_eq!(refresh_path("r 1/+"), "/auth/refresh?refresh_token=r+1%2F%2B");
    }

    #[test]
    fn only_unauthorized_and_forbidden_are_rejections() {
        let status = |status| ApiError::Http {
            status,
            message: String::new(),
        };
        assert!(status(401).is_rejection());
        assert!(status(403).is_rejection());
        assert!(!status(422).is_rejection());
        assert!(!status(500).is_rejection());
        assert!(!ApiError::Network("down".to_string()).is_rejection());
    }

    #[test]
    fn user_message_prefers_backend_detail() {
        let err = ApiError::Http {
            status: 401,
            message: "Invalid email or password".to_string(),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid email or password");
    }

    #[test]
    fn user_message_uses_fallback_without_detail() {
        let err = ApiError::Http {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn transport_errors_are_network() {
        assert!(ApiError::Network("refused".to_string()).is_network());
        assert!(ApiError::Timeout("slow".to_string()).is_network());
        assert!(!ApiError::Parse("bad".to_string()).is_network());
    }

    #[test]
    fn register_path_encodes_invitation_token() {
        assert_eq!(register_path(None), "/auth/register");
        assert_eq!(register_path(Some("  ")), "/auth/register");
        assert_eq!(
            register_path(Some("abc def")),
            "/auth/register?invitation_token=abc+def"
        );
    }

    #[test]
    fn invitation_path_encodes_token() {
        assert_eq!(invitation_path("tok/1"), "/auth/invitation/tok%2F1");
    }
}
