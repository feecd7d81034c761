//! Application state for the terminal front-end.
//!
//! Owns the session manager and the navigator, and tracks what the view
//! layer needs between commands (the inline login error, the last identity
//! it showed).

use std::path::PathBuf;
use std::sync::Arc;

use gatekeep_core::{
    AuthError, Config, CredentialStore, FileStorage, Navigator, Route, SessionManager,
    SessionState, SessionUser,
};
use tracing::{debug, info, warn};

pub struct App {
    pub config: Config,
    pub session: SessionManager,
    pub navigator: Navigator,

    pub login_email: String,
    pub login_error: Option<String>,
    pub notice: Option<String>,

    // Identity as last seen by the view; used to tell background expiry
    // apart from an explicit logout
    known_user: Option<SessionUser>,
}

impl App {
    /// Create a new application instance. Must be called inside the runtime.
    pub fn new(config: Config, cache_dir: PathBuf) -> Self {
        debug!(?cache_dir, "Storage directory configured");
        let storage = Arc::new(FileStorage::new(cache_dir));
        let store = CredentialStore::new(&config);
        let session = SessionManager::restore(store, storage, &config);
        debug!(authenticated = session.is_authenticated(), "Session restored");

        // Get the login email from env vars or config
        let login_email = std::env::var("GATEKEEP_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        let known_user = session.current_user();

        Self {
            config,
            session,
            navigator: Navigator::new(),
            login_email,
            login_error: None,
            notice: None,
            known_user,
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn go(&mut self, path: &str) -> Route {
        let state = self.state();
        if Route::from_path(path) != Route::Login {
            self.login_error = None;
        }
        self.navigator.navigate(&state, path)
    }

    /// Attempt login and, on success, return to the remembered location.
    pub async fn attempt_login(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return Err(AuthError::InvalidCredentials);
        }

        self.login_error = None;

        match self.session.login(email, password).await {
            Ok(user) => {
                self.login_email = email.to_string();
                self.config.last_email = Some(email.to_string());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.known_user = Some(user);
                let state = self.state();
                self.navigator.complete_login(&state);
                Ok(())
            }
            Err(e) => {
                info!(error = %e, "Login failed");
                self.login_error = Some(e.user_message());
                let state = self.state();
                self.navigator.navigate(&state, Route::Login.path());
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        self.known_user = None;
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "Logout could not clear storage");
            self.notice = Some(e.user_message());
        }
        let state = self.state();
        self.navigator.refresh(&state);
    }

    /// React to a session change the view did not initiate. Returns true when
    /// the current page must be redrawn.
    pub fn on_session_change(&mut self, state: &SessionState) -> bool {
        if self.known_user.is_some() && state.user.is_none() {
            info!("Session ended in the background");
            self.known_user = None;
            self.notice = Some("Your session has expired. Please log in again.".to_string());
            self.navigator.refresh(state);
            return true;
        }
        self.known_user = state.user.clone();
        false
    }
}
