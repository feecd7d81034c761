//! Simulated authentication backend.
//!
//! Stands in for a remote API: every call sleeps for the configured latency,
//! then answers from a fixed in-process user list.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AuthError, AuthResult};
use crate::models::{Profile, UserRecord};

use super::token::{self, TokenPayload};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: Vec<UserRecord>,
    latency: Duration,
    token_ttl: chrono::Duration,
}

impl CredentialStore {
    /// Store over the built-in demo accounts
    pub fn new(config: &Config) -> Self {
        Self::with_users(UserRecord::defaults(), config)
    }

    pub fn with_users(users: Vec<UserRecord>, config: &Config) -> Self {
        Self {
            users,
            latency: config.latency(),
            token_ttl: config.token_ttl(),
        }
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginResponse> {
        tokio::time::sleep(self.latency).await;

        let user = self
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or_else(|| {
                warn!(email, "Login rejected");
                AuthError::InvalidCredentials
            })?;

        let payload = TokenPayload {
            sub: user.id,
            name: user.name.clone(),
            role: user.role,
        };
        let token = token::encode(&payload, self.token_ttl);
        info!(user_id = user.id, role = %user.role, "Token issued");

        Ok(LoginResponse { token })
    }

    /// Resolve a token to the profile of the user it was issued for.
    pub async fn fetch_profile(&self, token: &str) -> AuthResult<Profile> {
        tokio::time::sleep(self.latency).await;

        let decoded = token::decode(token).ok_or(AuthError::Unauthenticated)?;
        if decoded.is_expired() {
            debug!(exp = decoded.exp, "Profile fetch with expired token");
            return Err(AuthError::Unauthenticated);
        }

        self.users
            .iter()
            .find(|u| u.id == decoded.payload.sub)
            .map(UserRecord::profile)
            .ok_or(AuthError::NotFound(decoded.payload.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn instant_config() -> Config {
        Config {
            latency_ms: 0,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_login_admin() {
        let store = CredentialStore::new(&instant_config());
        let response = store.login("admin@example.com", "adminpass").await.unwrap();
        let decoded = token::decode(&response.token).unwrap();
        assert_eq!(decoded.payload.role, Role::Admin);
        assert_eq!(decoded.payload.sub, 1);
        assert!(decoded.time_until_expiry() > chrono::Duration::minutes(119));
    }

    #[tokio::test]
    async fn test_login_user() {
        let store = CredentialStore::new(&instant_config());
        let response = store.login("user@example.com", "userpass").await.unwrap();
        assert_eq!(token::decode(&response.token).unwrap().payload.role, Role::User);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let store = CredentialStore::new(&instant_config());
        for (email, password) in [
            ("admin@example.com", "userpass"),
            ("user@example.com", "adminpass"),
            ("ADMIN@example.com", "adminpass"),
            ("nobody@example.com", "x"),
            ("", ""),
        ] {
            let err = store.login(email, password).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials), "{email}");
            assert_eq!(err.status_code(), 401);
        }
    }

    #[tokio::test]
    async fn test_fetch_profile() {
        let store = CredentialStore::new(&instant_config());
        let response = store.login("user@example.com", "userpass").await.unwrap();
        let profile = store.fetch_profile(&response.token).await.unwrap();
        assert_eq!(profile.email, "user@example.com");
        assert_eq!(profile.name, "Regular User");
        assert_eq!(profile.role, Role::User);
    }

    #[tokio::test]
    async fn test_fetch_profile_rejects_expired_and_garbage() {
        let store = CredentialStore::new(&instant_config());
        let payload = TokenPayload {
            sub: 1,
            name: "Admin User".to_string(),
            role: Role::Admin,
        };
        let expired = token::encode(&payload, chrono::Duration::seconds(-1));

        assert!(matches!(
            store.fetch_profile(&expired).await,
            Err(AuthError::Unauthenticated)
        ));
        assert!(matches!(
            store.fetch_profile("garbage").await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_fetch_profile_unknown_subject() {
        let store = CredentialStore::new(&instant_config());
        let payload = TokenPayload {
            sub: 99,
            name: "Ghost".to_string(),
            role: Role::User,
        };
        let token = token::encode(&payload, chrono::Duration::minutes(5));
        let err = store.fetch_profile(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(99)));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_fetch_profile_for_deleted_user() {
        let config = instant_config();
        let issued = CredentialStore::new(&config)
            .login("user@example.com", "userpass")
            .await
            .unwrap();

        let admins_only: Vec<UserRecord> = UserRecord::defaults()
            .into_iter()
            .filter(|u| u.role == Role::Admin)
            .collect();
        let store = CredentialStore::with_users(admins_only, &config);
        assert!(matches!(
            store.fetch_profile(&issued.token).await,
            Err(AuthError::NotFound(2))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let store = CredentialStore::new(&Config {
            latency_ms: 500,
            ..Config::default()
        });
        let started = tokio::time::Instant::now();
        store.login("user@example.com", "userpass").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
