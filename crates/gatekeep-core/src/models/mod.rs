//! Data models shared by the credential store, session manager and guards.
//!
//! - `Role`: coarse permission tag embedded in issued tokens
//! - `UserRecord`: a known account, including its demo password
//! - `Profile`: the sanitized view of a user returned by profile fetches
//! - `SessionUser`: the identity held by an authenticated session

pub mod user;

pub use user::{Profile, Role, SessionUser, UserRecord};
