//! gatekeep core library.
//!
//! Client-side route protection over a simulated backend: an unsigned token
//! codec, a fake credential store, a session manager with an expiry
//! watchdog, and pure route guards.

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod navigator;
pub mod routes;
pub mod storage;

pub use auth::{CredentialStore, SessionManager, SessionPhase, SessionState};
pub use config::Config;
pub use error::{AuthError, AuthResult};
pub use guard::{GuardDecision, Redirect};
pub use models::{Profile, Role, SessionUser, UserRecord};
pub use navigator::Navigator;
pub use routes::{Access, Route};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
