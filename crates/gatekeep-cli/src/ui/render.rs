//! Page rendering. Every page is static text; only the profile page talks to
//! the backend.

use gatekeep_core::{Access, Route, SessionState};

use crate::app::App;

const RULE: &str = "----------------------------------------";

pub fn banner() -> String {
    format!("gatekeep - protected routes demo\nType `help` for commands.\n{}", RULE)
}

pub fn prompt(app: &App) -> String {
    match app.session.current_user() {
        Some(user) => format!("{} [{}] {}> ", user.name, user.role, app.navigator.location()),
        None => format!("guest {}> ", app.navigator.location()),
    }
}

/// Render the page for the navigator's current route.
pub async fn render(app: &mut App) -> String {
    let route = app.navigator.route();
    let mut out = vec![format!("== {} ({}) ==", route.title(), app.navigator.location())];

    if let Some(notice) = app.notice.take() {
        out.push(format!("! {}", notice));
    }

    let state = app.state();
    match route {
        Route::Home => {
            out.push("Welcome. Some pages here require you to log in.".to_string());
            out.push("Public: /about   Members: /dashboard /profile   Admins: /admin".to_string());
        }
        Route::About => {
            out.push("This demo gates pages on authentication state and role.".to_string());
            out.push("Tokens are unsigned and live in local storage; nothing here is secure.".to_string());
        }
        Route::Login => {
            out.push("Demo accounts:".to_string());
            out.push("  admin@example.com / adminpass".to_string());
            out.push("  user@example.com  / userpass".to_string());
            if let Some(target) = app.navigator.return_to() {
                out.push(format!("You will be returned to {} after logging in.", target));
            }
            out.push("Use `login <email>` to sign in.".to_string());
            if let Some(ref error) = app.login_error {
                out.push(format!("Login failed: {}", error));
            }
        }
        Route::Unauthorized => {
            out.push("You do not have permission to view that page.".to_string());
        }
        Route::Dashboard => {
            if let Some(ref user) = state.user {
                out.push(format!("Hello, {}.", user.name));
                if let Some(minutes) = app.session.minutes_until_expiry() {
                    out.push(format!("Your session expires in {} min.", minutes));
                }
                if user.is_admin() {
                    out.push("You can manage the site from /admin.".to_string());
                }
            }
        }
        Route::Profile => match app.session.fetch_profile().await {
            Ok(profile) => {
                out.push(format!("Name:  {}", profile.name));
                out.push(format!("Email: {}", profile.email));
                out.push(format!("Role:  {}", profile.role.display_name()));
                out.push(format!("ID:    {}", profile.id));
            }
            Err(e) => out.push(format!("Could not load profile: {}", e.user_message())),
        },
        Route::Admin => {
            out.push("Admin panel. Only administrators can see this.".to_string());
        }
        Route::NotFound => {
            out.push("Nothing lives here. Try `routes`.".to_string());
        }
    }

    out.push(RULE.to_string());
    out.join("\n")
}

pub fn routes(state: &SessionState) -> String {
    let mut out = Vec::new();
    for route in Route::ALL.iter().filter(|r| **r != Route::NotFound) {
        let access = match route.access() {
            Access::Public => "public".to_string(),
            Access::Authenticated => "signed in".to_string(),
            Access::Roles(roles) => roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", "),
        };
        let allowed = gatekeep_core::guard::check(state, *route, route.path()).is_allowed();
        out.push(format!(
            "{} {:<14} {:<13} {}",
            if allowed { " " } else { "x" },
            route.path(),
            route.title(),
            access
        ));
    }
    out.join("\n")
}

pub fn whoami(app: &App) -> String {
    match app.session.current_user() {
        Some(user) => {
            let expiry = app
                .session
                .minutes_until_expiry()
                .map(|m| format!(", expires in {} min", m))
                .unwrap_or_default();
            format!("{} (id {}, {}){}", user.name, user.id, user.role, expiry)
        }
        None => "Not signed in.".to_string(),
    }
}

pub fn help() -> String {
    [
        "go <path>       visit a page (e.g. `go /profile`)",
        "<page>          shortcut, e.g. `profile` or `/admin`",
        "login [email]   sign in; password is prompted or read from GATEKEEP_PASSWORD",
        "logout          sign out",
        "whoami          show the current session",
        "routes          list pages and whether you may see them",
        "quit            exit",
    ]
    .join("\n")
}
