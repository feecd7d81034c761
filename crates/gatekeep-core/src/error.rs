use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthenticated - token missing, malformed or expired")]
    Unauthenticated,

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("A login attempt is already in progress")]
    LoginInProgress,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AuthError {
    /// Status-like code for display, mirroring what an HTTP backend would answer.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthenticated => 401,
            AuthError::NotFound(_) => 404,
            AuthError::LoginInProgress => 409,
            AuthError::Storage(_) => 500,
        }
    }

    /// Short message suitable for showing next to a form or on a page
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::Unauthenticated => "Your session has expired. Please log in again.".to_string(),
            AuthError::NotFound(_) => "Your account no longer exists".to_string(),
            AuthError::LoginInProgress => "Already logging in, please wait".to_string(),
            AuthError::Storage(e) => format!("Could not access local storage: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::Unauthenticated.status_code(), 401);
        assert_eq!(AuthError::NotFound(7).status_code(), 404);
        assert_eq!(AuthError::LoginInProgress.status_code(), 409);
        assert_eq!(AuthError::from(anyhow::anyhow!("disk full")).status_code(), 500);
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err = AuthError::from(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "disk full");
    }
}
