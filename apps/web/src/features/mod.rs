//! Domain-level frontend features. Routes import these modules to keep view
//! code focused while security and API handling live in dedicated areas.

pub(crate) mod auth;
