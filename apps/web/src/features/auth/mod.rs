//! Auth feature module: the browser bindings for the shared session core.
//! Tokens are bearer credentials kept in `localStorage`; this module touches
//! that security boundary and must avoid logging token material.
//!
//! Flow overview: email/password login and registration exchange credentials
//! for a token pair. Google sign-in navigates away to the provider and comes
//! back through `/auth/google/callback` with the pair in the query string.

pub(crate) mod client;
mod guards;
pub(crate) mod state;
pub(crate) mod storage;

pub(crate) use guards::ProtectedRoute;
