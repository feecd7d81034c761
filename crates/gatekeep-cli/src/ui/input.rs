//! Prompt command handling.

use anyhow::Result;
use gatekeep_core::Route;

use crate::app::App;
use super::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Login(Option<String>),
    Logout,
    WhoAmI,
    Routes,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Command::Empty;
        };
        let arg = parts.next().map(str::to_string);

        match verb.to_lowercase().as_str() {
            "go" | "cd" | "open" => Command::Go(arg.unwrap_or_else(|| "/".to_string())),
            "login" => Command::Login(arg),
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "routes" => Command::Routes,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            // Shortcuts: `profile`, `admin`, `/about`, ...
            other => {
                let path = if other.starts_with('/') {
                    other.to_string()
                } else {
                    format!("/{}", other)
                };
                match Route::from_path(&path) {
                    Route::NotFound => Command::Unknown(verb.to_string()),
                    _ => Command::Go(path),
                }
            }
        }
    }
}

/// Handle one line of input. Returns true when the app should quit.
pub async fn handle_command(app: &mut App, line: &str) -> Result<bool> {
    match Command::parse(line) {
        Command::Empty => {}
        Command::Quit => return Ok(true),
        Command::Help => println!("{}", render::help()),
        Command::Routes => println!("{}", render::routes(&app.state())),
        Command::WhoAmI => println!("{}", render::whoami(app)),
        Command::Unknown(verb) => println!("Unknown command: {} (try `help`)", verb),
        Command::Go(path) => {
            app.go(&path);
            println!("{}", render::render(app).await);
        }
        Command::Logout => {
            app.logout();
            println!("Logged out.");
            println!("{}", render::render(app).await);
        }
        Command::Login(email) => {
            let email = email.unwrap_or_else(|| app.login_email.clone());
            if email.is_empty() {
                println!("Usage: login <email>");
                return Ok(false);
            }
            let password = match std::env::var("GATEKEEP_PASSWORD") {
                Ok(p) if !p.is_empty() => p,
                _ => prompt_password().await?,
            };
            println!("Signing in as {}...", email);
            // Failures are shown inline on the login page
            let _ = app.attempt_login(&email, &password).await;
            println!("{}", render::render(app).await);
        }
    }
    Ok(false)
}

/// Read the password off the terminal without tying up a runtime worker.
async fn prompt_password() -> Result<String> {
    let password = tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: ")).await??;
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("go /about"), Command::Go("/about".to_string()));
        assert_eq!(Command::parse("go"), Command::Go("/".to_string()));
        assert_eq!(Command::parse("login a@b.c"), Command::Login(Some("a@b.c".to_string())));
        assert_eq!(Command::parse("login"), Command::Login(None));
        assert_eq!(Command::parse("LOGOUT"), Command::Logout);
        assert_eq!(Command::parse("exit"), Command::Quit);
    }

    #[test]
    fn test_parse_route_shortcuts() {
        assert_eq!(Command::parse("profile"), Command::Go("/profile".to_string()));
        assert_eq!(Command::parse("/admin"), Command::Go("/admin".to_string()));
        assert_eq!(Command::parse("frobnicate"), Command::Unknown("frobnicate".to_string()));
    }
}
