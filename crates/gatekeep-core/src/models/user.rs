use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Get the display name for this role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known account. Passwords are plaintext: this backend is a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl UserRecord {
    pub fn new(id: i64, email: &str, password: &str, name: &str, role: Role) -> Self {
        Self {
            id,
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role,
        }
    }

    /// The built-in demo accounts
    pub fn defaults() -> Vec<UserRecord> {
        vec![
            UserRecord::new(1, "admin@example.com", "adminpass", "Admin User", Role::Admin),
            UserRecord::new(2, "user@example.com", "userpass", "Regular User", Role::User),
        ]
    }

    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// User details safe to hand to the view layer (no password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_profile_has_no_password() {
        let admin = &UserRecord::defaults()[0];
        let json = serde_json::to_string(&admin.profile()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("adminpass"));
    }

    #[test]
    fn test_default_emails_are_unique() {
        let users = UserRecord::defaults();
        assert_eq!(users.len(), 2);
        assert_ne!(users[0].email, users[1].email);
    }
}
