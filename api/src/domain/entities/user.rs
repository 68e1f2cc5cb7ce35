//! User domain entity
//!
//! Represents a person using the platform: a patient raising test requests,
//! or a staff member (tester, doctor, authority) working on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization role. Used for gating only, never for business decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// A patient
    User,
    Doctor,
    Tester,
    GovernmentAuthority,
}

impl Role {
    /// Staff roles cannot be self-assigned without the registration secret
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::User)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Doctor => write!(f, "DOCTOR"),
            Role::Tester => write!(f, "TESTER"),
            Role::GovernmentAuthority => write!(f, "GOVERNMENT_AUTHORITY"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "DOCTOR" => Ok(Role::Doctor),
            "TESTER" => Ok(Role::Tester),
            "GOVERNMENT_AUTHORITY" => Ok(Role::GovernmentAuthority),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// An authenticated platform user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub api_key_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

/// Data needed to create a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub api_key_hash: String,
}
