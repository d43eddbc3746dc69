//! User model
//!
//! Account holders. Merchants can receive transfers but never initiate them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Document, Money};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Common,
    Merchant,
}

impl Default for Role {
    fn default() -> Self {
        Self::Common
    }
}

impl Role {
    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Common => "common",
            Role::Merchant => "merchant",
        }
    }
}

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub document: Document,
    pub email: String,
    pub password_hash: String,
    pub balance: Money,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_merchant(&self) -> bool {
        self.role == Role::Merchant
    }
}

/// Data required to persist a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub document: Document,
    pub email: String,
    pub password_hash: String,
    pub balance: Money,
    pub role: Role,
}
