//! HTTP helpers for the JSON auth API with consistent timeouts and error
//! handling. The auth client uses these helpers to avoid duplicating request
//! setup and to enforce a predictable timeout policy. Bearer tokens are
//! attached only when a caller passes one.

use super::config::AppConfig;
use auth_session::api::{error_message_from_body, ApiError};
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::to_string;
use web_sys::AbortController;

/// Default request timeout (milliseconds) applied to all HTTP helpers.
const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Fetches JSON, optionally authenticated with a bearer token.
pub async fn get_json<T: DeserializeOwned>(
    path: &str,
    bearer: Option<&str>,
) -> Result<T, ApiError> {
    let url = build_url(path)?;
    let response = send_with_timeout(|signal| {
        let mut builder = Request::get(&url).abort_signal(Some(signal));
        if let Some(token) = bearer {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }
        builder
            .build()
            .map_err(|err| ApiError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    handle_json_response(response).await
}

/// Posts a JSON body and parses a JSON response.
pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    let url = build_url(path)?;
    let payload = to_string(body)
        .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))?;
    let response = send_with_timeout(move |signal| {
        Request::post(&url)
            .header("Content-Type", "application/json")
            .abort_signal(Some(signal))
            .body(payload)
            .map_err(|err| ApiError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    handle_json_response(response).await
}

/// Builds a URL from the configured API base URL and the provided path.
fn build_url(path: &str) -> Result<String, ApiError> {
    let config = AppConfig::load();
    let base = config
        .api_base_url()
        .ok_or_else(|| ApiError::Config("VORTIX_API_URL is not configured.".to_string()))?;
    Ok(build_url_with_base(base, path))
}

fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    format!("{}/{}", base, path.trim().trim_start_matches('/'))
}

/// Maps network errors into `ApiError` variants with timeout detection.
fn map_request_error(err: gloo_net::Error) -> ApiError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("abort") {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        ApiError::Network(format!("Unable to reach the server: {message}"))
    }
}

/// Sends a request with an abort timeout to avoid hanging UI state.
async fn send_with_timeout(
    build_request: impl FnOnce(&web_sys::AbortSignal) -> Result<Request, ApiError>,
) -> Result<gloo_net::http::Response, ApiError> {
    let controller = AbortController::new()
        .map_err(|_| ApiError::Config("Failed to initialize request timeout.".to_string()))?;
    let signal = controller.signal();
    let timeout_controller = controller.clone();
    let _timeout = Timeout::new(DEFAULT_TIMEOUT_MS, move || timeout_controller.abort());

    let request = build_request(&signal)?;
    request.send().await.map_err(map_request_error)
}

/// Parses JSON responses and surfaces HTTP errors with the backend's detail.
async fn handle_json_response<T: DeserializeOwned>(
    response: gloo_net::http::Response,
) -> Result<T, ApiError> {
    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status,
            message: error_message_from_body(&body),
        })
    }
}
