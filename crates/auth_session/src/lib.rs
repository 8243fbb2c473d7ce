//! # auth_session
//!
//! Client-side authentication session for the VortixPR site and admin backend.
//!
//! ## Session lifecycle
//!
//! A session starts empty and loading. [`SessionStore::initialize`] reads the
//! stored access token and asks the backend who it belongs to. A rejected or
//! unreadable token purges both stored tokens; the session then stays
//! anonymous. `login`/`register` populate the session and persist the token
//! pair, `logout` clears both synchronously.
//!
//! ## Storage
//!
//! All token reads and writes funnel through [`TokenStore`], which owns the two
//! durable keys `access_token` and `refresh_token`. Platforms plug in their own
//! [`KeyValueStorage`] (a JSON file on native, `localStorage` in the browser).
//!
//! ## Route protection
//!
//! [`guard::evaluate`] is a pure function of the session snapshot. It is a UX
//! gate only; the API enforces access control on its own.
//!
//! ## Google sign-in
//!
//! Sign-in is a two-phase redirect: [`SessionStore::login_with_google`] yields
//! the authorization URL, and [`OAuthCallback`] consumes the tokens the backend
//! appends to `/auth/google/callback`.

pub mod api;
pub mod guard;
pub mod model;
pub mod oauth;
pub mod session;
pub mod storage;

pub use api::{ApiError, AuthApi};
pub use guard::{GuardOptions, GuardOutcome};
pub use model::{
    ApiUser, Credentials, GoogleLoginUrl, InvitationInfo, Registration, TokenPair, TokenResponse,
    User, UserRole,
};
pub use oauth::{CallbackOutcome, CallbackState, OAuthCallback};
pub use session::{SessionState, SessionStore};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError, TokenStore};

#[cfg(test)]
pub(crate) mod test_support;
