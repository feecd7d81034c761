//! Opaque session tokens.
//!
//! A token is the base64 (URL-safe, unpadded) encoding of a small JSON object
//! `{"sub", "name", "role", "exp"}`. Nothing is signed: anyone who knows the
//! scheme can mint one. Only suitable for the simulated backend.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Role, SessionUser};

/// Identity carried by a token, before an expiry is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub sub: i64,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(flatten)]
    pub payload: TokenPayload,
    /// Expiry as unix seconds
    pub exp: i64,
}

impl Token {
    /// Time left before expiry; negative once elapsed.
    pub fn time_until_expiry(&self) -> Duration {
        let millis = self
            .exp
            .saturating_mul(1000)
            .saturating_sub(Utc::now().timestamp_millis())
            .max(-i64::MAX);
        Duration::try_milliseconds(millis).unwrap_or_else(Duration::zero)
    }

    pub fn is_expired(&self) -> bool {
        self.time_until_expiry() <= Duration::zero()
    }

    pub fn user(&self) -> SessionUser {
        SessionUser {
            id: self.payload.sub,
            name: self.payload.name.clone(),
            role: self.payload.role,
        }
    }
}

/// Encode `payload` with an absolute expiry of now + `ttl`.
/// Expiries past the representable range are clamped to its ends.
pub fn encode(payload: &TokenPayload, ttl: Duration) -> String {
    let exp = Utc::now()
        .checked_add_signed(ttl)
        .unwrap_or(if ttl > Duration::zero() {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
        .timestamp();
    let json = serde_json::json!({
        "sub": payload.sub,
        "name": payload.name,
        "role": payload.role,
        "exp": exp,
    });
    URL_SAFE_NO_PAD.encode(json.to_string())
}

/// Decode a token string. Returns `None` for anything malformed; expiry is
/// not checked here.
pub fn decode(token: &str) -> Option<Token> {
    let bytes = match URL_SAFE_NO_PAD.decode(token.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "Token is not valid base64");
            return None;
        }
    };

    match serde_json::from_slice::<Token>(&bytes) {
        Ok(token) if DateTime::from_timestamp(token.exp, 0).is_none() => {
            debug!(exp = token.exp, "Token expiry out of range");
            None
        }
        Ok(token) => Some(token),
        Err(e) => {
            debug!(error = %e, "Token payload is not valid JSON");
            None
        }
    }
}
