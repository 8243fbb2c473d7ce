//! `reqwest` implementation of the auth API boundary. Every request carries the
//! crate user agent, a fixed timeout and its own tracing span. Token material
//! only ever travels in headers or bodies, never in span fields.

use crate::APP_USER_AGENT;
use async_trait::async_trait;
use auth_session::api::{
    self, error_message_from_body, invitation_path, paths, refresh_path, register_path, ApiError,
    AuthApi,
};
use auth_session::model::{
    ApiUser, Credentials, GoogleLoginUrl, InvitationInfo, RefreshRequest, Registration,
    TokenResponse,
};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

impl HttpAuthApi {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|err| ApiError::Config(format!("invalid API URL {base_url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "unsupported API URL scheme: {}",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim().trim_start_matches('/'))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        name: &'static str,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let span = info_span!("auth_api.request", op = name, http.method = method, path = %path);
        async move {
            let response = request.send().await.map_err(map_request_error)?;
            handle_json_response(response).await
        }
        .instrument(span)
        .await
    }
}

#[async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn fetch_me(&self, access_token: &SecretString) -> Result<ApiUser, ApiError> {
        let request = self
            .client
            .get(self.url(paths::ME))
            .bearer_auth(access_token.expose_secret());
        self.send_json("fetch_me", "GET", paths::ME, request).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let request = self.client.post(self.url(paths::LOGIN)).json(credentials);
        self.send_json("login", "POST", paths::LOGIN, request).await
    }

    async fn register(
        &self,
        registration: &Registration,
        invitation_token: Option<&str>,
    ) -> Result<TokenResponse, ApiError> {
        let path = register_path(invitation_token);
        let request = self.client.post(self.url(&path)).json(registration);
        // The invitation token is a credential; keep it out of the span.
        self.send_json("register", "POST", paths::REGISTER, request)
            .await
    }

    async fn google_login_url(&self) -> Result<GoogleLoginUrl, ApiError> {
        let request = self.client.get(self.url(paths::GOOGLE_LOGIN));
        self.send_json("google_login_url", "GET", paths::GOOGLE_LOGIN, request)
            .await
    }

    async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenResponse, ApiError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        };
        let path = refresh_path(refresh_token.expose_secret());
        let request = self.client.post(self.url(&path)).json(&body);
        self.send_json("refresh", "POST", paths::REFRESH, request)
            .await
    }

    async fn invitation(&self, token: &str) -> Result<InvitationInfo, ApiError> {
        let request = self.client.get(self.url(&invitation_path(token)));
        self.send_json("invitation", "GET", paths::INVITATION, request)
            .await
    }
}

/// Maps transport errors into timeout and network variants.
/// The URL is stripped from the error; renewal carries a token in its query.
fn map_request_error(err: reqwest::Error) -> ApiError {
    let err = err.without_url();
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with the backend's detail.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")));
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "auth API rejected request");
    Err(ApiError::Http {
        status: status.as_u16(),
        message: error_message_from_body(&body),
    })
}
