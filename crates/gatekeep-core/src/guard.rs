//! Route guards.
//!
//! Pure functions of the session state and the requested location. They do
//! not navigate; they return a decision the navigation layer applies.
//! Guards are a UX convenience only and enforce nothing on their own.

use crate::auth::SessionState;
use crate::models::Role;
use crate::routes::{Access, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: Route,
    /// Location to restore after the user logs in
    pub return_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Anonymous sessions are sent to the login page, remembering `requested`.
pub fn require_auth(state: &SessionState, requested: &str) -> GuardDecision {
    if state.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Redirect {
            target: Route::Login,
            return_to: Some(requested.to_string()),
        })
    }
}

/// `require_auth`, then the user's role must be one of `allowed`.
pub fn require_role(state: &SessionState, requested: &str, allowed: &[Role]) -> GuardDecision {
    let decision = require_auth(state, requested);
    if !decision.is_allowed() {
        return decision;
    }

    let has_role = state
        .user
        .as_ref()
        .map(|user| allowed.contains(&user.role))
        .unwrap_or(false);

    if has_role {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Redirect {
            target: Route::Unauthorized,
            return_to: None,
        })
    }
}

/// Apply whichever guard the route's access policy calls for.
pub fn check(state: &SessionState, route: Route, requested: &str) -> GuardDecision {
    match route.access() {
        Access::Public => GuardDecision::Allow,
        Access::Authenticated => require_auth(state, requested),
        Access::Roles(allowed) => require_role(state, requested, allowed),
    }
}
