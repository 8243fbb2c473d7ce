//! Shared UI components exported for routes and features.

mod already_signed_in;
mod guard_views;
pub(crate) mod layout;
pub(crate) mod ui;

pub(crate) use already_signed_in::AlreadySignedInPanel;
pub(crate) use guard_views::{Forbidden, LoadingScreen};
pub(crate) use layout::AppShell;
pub(crate) use ui::{Alert, AlertKind, Button, Spinner};
