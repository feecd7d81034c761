//! Applies guard decisions to a current location.
//!
//! The navigator is the only place a `Redirect` is followed. It keeps the
//! location a login redirect interrupted so `complete_login` can return there.

use tracing::debug;

use crate::auth::SessionState;
use crate::guard::{self, GuardDecision};
use crate::routes::Route;

/// Where a login lands when no location was remembered
const DEFAULT_LANDING: &str = "/dashboard";

#[derive(Debug, Clone)]
pub struct Navigator {
    location: String,
    route: Route,
    return_to: Option<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            location: Route::Home.path().to_string(),
            route: Route::Home,
            return_to: None,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn return_to(&self) -> Option<&str> {
        self.return_to.as_deref()
    }

    /// Go to `path`, following at most one guard redirect. Returns the route
    /// that ends up rendered.
    pub fn navigate(&mut self, state: &SessionState, path: &str) -> Route {
        let route = Route::from_path(path);

        if route == Route::Login && state.is_authenticated() {
            debug!("Already signed in, skipping login page");
            return self.navigate(state, DEFAULT_LANDING);
        }

        match guard::check(state, route, path) {
            GuardDecision::Allow => {
                self.land(path.to_string(), route);
            }
            GuardDecision::Redirect(redirect) => {
                debug!(from = path, to = redirect.target.path(), "Guard redirect");
                if redirect.return_to.is_some() {
                    self.return_to = redirect.return_to;
                }
                self.land(redirect.target.path().to_string(), redirect.target);
            }
        }
        self.route
    }

    /// After a successful login, go back to the remembered location.
    pub fn complete_login(&mut self, state: &SessionState) -> Route {
        let target = self
            .return_to
            .take()
            .unwrap_or_else(|| DEFAULT_LANDING.to_string());
        self.navigate(state, &target)
    }

    /// Re-run the guards for the current location, e.g. after the session
    /// changed underneath it.
    pub fn refresh(&mut self, state: &SessionState) -> Route {
        let location = self.location.clone();
        self.navigate(state, &location)
    }

    fn land(&mut self, location: String, route: Route) {
        self.location = location;
        self.route = route;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{CredentialStore, SessionManager};
    use crate::config::Config;
    use crate::storage::MemoryStorage;

    fn manager() -> SessionManager {
        let config = Config {
            latency_ms: 0,
            ..Config::default()
        };
        SessionManager::restore(
            CredentialStore::new(&config),
            Arc::new(MemoryStorage::new()),
            &config,
        )
    }

    #[tokio::test]
    async fn test_login_returns_to_requested_route() {
        let session = manager();
        let mut nav = Navigator::new();

        assert_eq!(nav.navigate(&session.state(), "/profile"), Route::Login);
        assert_eq!(nav.location(), "/login");
        assert_eq!(nav.return_to(), Some("/profile"));

        session.login("user@example.com", "userpass").await.unwrap();
        assert_eq!(nav.complete_login(&session.state()), Route::Profile);
        assert_eq!(nav.location(), "/profile");
        assert_eq!(nav.return_to(), None);
    }

    #[tokio::test]
    async fn test_login_without_remembered_location_lands_on_dashboard() {
        let session = manager();
        let mut nav = Navigator::new();
        nav.navigate(&session.state(), "/login");

        session.login("user@example.com", "userpass").await.unwrap();
        assert_eq!(nav.complete_login(&session.state()), Route::Dashboard);
    }

    #[tokio::test]
    async fn test_auth_guard_follows_login_and_logout() {
        let session = manager();
        let mut nav = Navigator::new();

        session.login("user@example.com", "userpass").await.unwrap();
        assert_eq!(nav.navigate(&session.state(), "/dashboard"), Route::Dashboard);

        session.logout().unwrap();
        assert_eq!(nav.refresh(&session.state()), Route::Login);
        assert_eq!(nav.return_to(), Some("/dashboard"));
    }

    #[tokio::test]
    async fn test_admin_route_by_role() {
        let session = manager();
        let mut nav = Navigator::new();

        session.login("user@example.com", "userpass").await.unwrap();
        assert_eq!(nav.navigate(&session.state(), "/admin"), Route::Unauthorized);
        assert_eq!(nav.return_to(), None);

        session.login("admin@example.com", "adminpass").await.unwrap();
        assert_eq!(nav.navigate(&session.state(), "/admin"), Route::Admin);
    }

    #[test]
    fn test_signed_in_user_skips_login_page() {
        let state = SessionState::authenticated(crate::models::SessionUser {
            id: 2,
            name: "Regular User".to_string(),
            role: crate::models::Role::User,
        });
        let mut nav = Navigator::new();
        assert_eq!(nav.navigate(&state, "/login"), Route::Dashboard);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let mut nav = Navigator::new();
        assert_eq!(nav.navigate(&SessionState::anonymous(), "/missing"), Route::NotFound);
        assert_eq!(nav.location(), "/missing");
    }
}
