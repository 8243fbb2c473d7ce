//! # Vortix (session client)
//!
//! Native client for the VortixPR authentication API. It drives the shared
//! [`auth_session`] store from the command line: credential login,
//! invitation-based registration, Google sign-in via a pasted callback URL, and
//! route-guard checks against the current session.
//!
//! Tokens are persisted in a JSON file under the platform config directory
//! (see [`storage::FileStorage`]). They are never printed or logged.

pub mod cli;
pub mod client;
pub mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
