//! The logical routes of the application and who may see them.

use crate::models::Role;

/// Who may render a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Route {
    Home,
    About,
    Login,
    Unauthorized,
    Dashboard,
    Profile,
    Admin,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Home,
        Route::About,
        Route::Login,
        Route::Unauthorized,
        Route::Dashboard,
        Route::Profile,
        Route::Admin,
        Route::NotFound,
    ];

    /// Resolve a location to a route. Query strings, fragments and trailing
    /// slashes are ignored; anything unknown is `NotFound`.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim().trim_end_matches('/');
        match path {
            "" => Route::Home,
            "/about" => Route::About,
            "/login" => Route::Login,
            "/unauthorized" => Route::Unauthorized,
            "/dashboard" => Route::Dashboard,
            "/profile" => Route::Profile,
            "/admin" => Route::Admin,
            _ => Route::NotFound,
        }
    }

    /// Canonical path. `NotFound` has no path of its own.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::About => "/about",
            Route::Login => "/login",
            Route::Unauthorized => "/unauthorized",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
            Route::Admin => "/admin",
            Route::NotFound => "*",
        }
    }

    /// Get the display title for this route.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::About => "About",
            Route::Login => "Login",
            Route::Unauthorized => "Unauthorized",
            Route::Dashboard => "Dashboard",
            Route::Profile => "Profile",
            Route::Admin => "Admin",
            Route::NotFound => "Not Found",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Dashboard | Route::Profile => Access::Authenticated,
            Route::Admin => Access::Roles(ADMIN_ONLY),
            _ => Access::Public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/profile/"), Route::Profile);
        assert_eq!(Route::from_path("/admin?tab=users"), Route::Admin);
        assert_eq!(Route::from_path("/dashboard#top"), Route::Dashboard);
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
        assert_eq!(Route::from_path("/profile/extra"), Route::NotFound);
    }

    #[test]
    fn test_paths_resolve_to_themselves() {
        for route in Route::ALL.iter().filter(|r| **r != Route::NotFound) {
            assert_eq!(Route::from_path(route.path()), *route);
        }
    }

    #[test]
    fn test_access_policy() {
        assert_eq!(Route::Home.access(), Access::Public);
        assert_eq!(Route::Login.access(), Access::Public);
        assert_eq!(Route::Profile.access(), Access::Authenticated);
        assert_eq!(Route::Admin.access(), Access::Roles(&[Role::Admin]));
    }
}
