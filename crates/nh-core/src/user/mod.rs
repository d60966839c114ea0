//! Staff accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BranchId, UserId};

/// Well-known id of the bootstrap administrator.
pub const BOOTSTRAP_ADMIN_ID: &str = "admin1";

/// Display name of the bootstrap administrator.
pub const BOOTSTRAP_ADMIN_NAME: &str = "Admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Operator,
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Operator => "operator",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "operator" => Ok(UserRole::Operator),
            "manager" => Ok(UserRole::Manager),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A staff member.
///
/// `password_hash` holds an encoded Argon2id hash produced by
/// [`crate::crypto::hash_password`]; the plaintext is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    pub password_hash: String,
    #[serde(default)]
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Builds the administrator synthesized on first start.
    pub fn bootstrap_admin(password_hash: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: UserId::from(BOOTSTRAP_ADMIN_ID),
            name: BOOTSTRAP_ADMIN_NAME.to_string(),
            role: UserRole::Admin,
            branch_id: None,
            password_hash,
            is_approved: true,
            created_at,
        }
    }
}
