//! Account model - the directory's single entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Account roles. A closed set; capabilities are defined per role in the
/// authorization table, never derived by comparing roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub enum Role {
    Admin,
    Viewer,
    User,
    // Same capabilities as User today; kept distinct so the two can diverge.
    SelfOnly,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Viewer => "Viewer",
            Role::User => "User",
            Role::SelfOnly => "SelfOnly",
        }
    }

    /// Human-readable access summary returned in the login response.
    pub fn access_message(&self) -> &'static str {
        match self {
            Role::Admin => "You have full access to manage all users.",
            Role::Viewer => "You can view all users but cannot make changes.",
            Role::User | Role::SelfOnly => "You can only view your own data.",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Viewer" => Ok(Role::Viewer),
            "User" => Ok(Role::User),
            "SelfOnly" => Ok(Role::SelfOnly),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Account entity as stored. The password digest never leaves the service;
/// responses go through `dtos::user::UserResponse`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Account to insert; the store assigns the identifier.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
    pub description: Option<String>,
}
