//! Authentication module for issuing tokens and managing the user session.
//!
//! This module provides:
//! - `token`: the unsigned token codec
//! - `CredentialStore`: a simulated backend with `login` and `fetch_profile`
//! - `SessionManager`: persisted session state with automatic expiry
//!
//! Tokens expire after 2 hours by default; the session logs itself out shortly
//! after the persisted token's expiry instant.

pub mod session;
pub mod store;
pub mod token;

pub use session::{SessionManager, SessionPhase, SessionState, TOKEN_KEY};
pub use store::{CredentialStore, LoginResponse};
pub use token::{Token, TokenPayload};
