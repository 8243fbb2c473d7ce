//! Shared frontend utilities for API access and configuration.
//!
//! ## Token transport
//!
//! The backend issues bearer tokens. They live in `localStorage` under
//! `access_token`/`refresh_token` and are attached per request by the auth
//! feature client; these helpers only forward headers provided by callers and
//! must never log them.

#[cfg(target_arch = "wasm32")]
pub(crate) mod api;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) mod config;
