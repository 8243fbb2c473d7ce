//! Route protection. UX-only: the API still enforces access control on every
//! request.

use crate::session::SessionState;

pub const LOGIN_ROUTE: &str = "/login";
/// Query parameter carrying the attempted location through the login page.
pub const RETURN_PARAM: &str = "from";
pub const HOME_ROUTE: &str = "/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardOptions {
    pub require_admin: bool,
}

impl GuardOptions {
    #[must_use]
    pub const fn admin() -> Self {
        Self {
            require_admin: true,
        }
    }
}

/// What a protected route should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session is still being resolved; render only a placeholder.
    Loading,
    /// No session; replace the history entry with the login route and keep
    /// the attempted location for the post-login return.
    Redirect { to: String, from: String },
    /// Signed in without the required role.
    Forbidden,
    Render,
}

#[must_use]
pub fn evaluate(state: &SessionState, options: GuardOptions, attempted: &str) -> GuardOutcome {
    if state.is_loading {
        return GuardOutcome::Loading;
    }

    let Some(user) = &state.user else {
        return GuardOutcome::Redirect {
            to: LOGIN_ROUTE.to_string(),
            from: attempted.to_string(),
        };
    };

    if options.require_admin && !user.is_admin() {
        return GuardOutcome::Forbidden;
    }

    GuardOutcome::Render
}

/// Joins a router pathname and search string into the location a guard
/// reports as attempted. `search` may or may not carry its leading `?`.
#[must_use]
pub fn attempted_location(pathname: &str, search: &str) -> String {
    let query = search.trim_start_matches('?');
    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}

/// Login URL that returns to `from` once the user has signed in.
#[must_use]
pub fn login_href(from: &str) -> String {
    match safe_return_path(Some(from)) {
        Some(path) if path != HOME_ROUTE => format!(
            "{LOGIN_ROUTE}?{}",
            url::form_urlencoded::Serializer::new(String::new())
                .append_pair(RETURN_PARAM, path)
                .finish()
        ),
        _ => LOGIN_ROUTE.to_string(),
    }
}

/// Where to go after a successful login. Only same-origin absolute paths are
/// honoured; anything else lands on the home route.
#[must_use]
pub fn post_login_destination(from: Option<&str>) -> String {
    safe_return_path(from).unwrap_or(HOME_ROUTE).to_string()
}

fn safe_return_path(from: Option<&str>) -> Option<&str> {
    let path = from?.trim();
    let same_origin = path.starts_with('/') && !path.starts_with("//") && !path.contains('\\');
    if !same_origin || is_login_route(path) {
        return None;
    }
    Some(path)
}

/// True for `/login` itself, with or without a query, fragment or subpath.
fn is_login_route(path: &str) -> bool {
    path.strip_prefix(LOGIN_ROUTE)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['?', '#', '/']))
}
