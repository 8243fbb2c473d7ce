//! `gloo-net` implementation of the auth API boundary. Bearer tokens are only
//! attached to the identity request and are never logged.

use crate::app_lib::api::{get_json, post_json};
use async_trait::async_trait;
use auth_session::api::{
    invitation_path, paths, refresh_path, register_path, ApiError, AuthApi,
};
use auth_session::model::{
    ApiUser, Credentials, GoogleLoginUrl, InvitationInfo, RefreshRequest, Registration,
    TokenResponse,
};
use secrecy::{ExposeSecret, SecretString};

#[derive(Clone, Copy, Debug, Default)]
pub struct GlooAuthApi;

#[async_trait(?Send)]
impl AuthApi for GlooAuthApi {
    async fn fetch_me(&self, access_token: &SecretString) -> Result<ApiUser, ApiError> {
        get_json(paths::ME, Some(access_token.expose_secret())).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        post_json(paths::LOGIN, credentials).await
    }

    async fn register(
        &self,
        registration: &Registration,
        invitation_token: Option<&str>,
    ) -> Result<TokenResponse, ApiError> {
        post_json(&register_path(invitation_token), registration).await
    }

    async fn google_login_url(&self) -> Result<GoogleLoginUrl, ApiError> {
        get_json(paths::GOOGLE_LOGIN, None).await
    }

    async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenResponse, ApiError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        };
        post_json(&refresh_path(body.refresh_token), &body).await
    }

    async fn invitation(&self, token: &str) -> Result<InvitationInfo, ApiError> {
        get_json(&invitation_path(token), None).await
    }
}
