//! Roles, principals and credential hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id behind the `CredentialVerifier` trait
//! - The two account roles
//! - `Principal`, the authenticated caller passed into every operation

mod password;

pub use password::{Argon2Verifier, CredentialVerifier, PasswordError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reseller_shared::types::{AdminId, SellerId};

use crate::error::PanelError;
use crate::store::Seller;

/// Account roles. Each role authenticates against its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Provisions sellers and sets their credit balances.
    Admin,
    /// Spends credits to provision end users.
    Seller,
}

impl Role {
    /// Returns the storage table this role authenticates against.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Admin => "admins",
            Self::Seller => "sellers",
        }
    }

    /// Returns the role name as it appears in tokens and payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Seller => "seller",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "seller" => Ok(Self::Seller),
            other => Err(PanelError::InvalidArgument(format!("unknown role '{other}'"))),
        }
    }
}

/// An authenticated actor.
///
/// Built by the identity store at login and rebuilt from the session token
/// on each request. `credits` is a cached view for sellers; anything that
/// depends on the balance re-reads it from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account ID in the role's table.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Role the account authenticated as.
    pub role: Role,
    /// Credit balance at the last refresh (sellers only).
    pub credits: Option<i64>,
}

impl Principal {
    /// Creates an admin principal.
    #[must_use]
    pub fn admin(id: AdminId, username: impl Into<String>) -> Self {
        Self {
            id: id.into_inner(),
            username: username.into(),
            role: Role::Admin,
            credits: None,
        }
    }

    /// Creates a seller principal from its current row.
    #[must_use]
    pub fn seller(seller: &Seller) -> Self {
        Self {
            id: seller.id.into_inner(),
            username: seller.username.clone(),
            role: Role::Seller,
            credits: Some(seller.credits),
        }
    }

    /// Rebuilds a principal from session data without a balance.
    #[must_use]
    pub fn from_session(id: Uuid, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            credits: None,
        }
    }

    /// Returns the admin ID if this principal is an admin.
    #[must_use]
    pub const fn admin_id(&self) -> Option<AdminId> {
        match self.role {
            Role::Admin => Some(AdminId::from_uuid(self.id)),
            Role::Seller => None,
        }
    }

    /// Returns the seller ID if this principal is a seller.
    #[must_use]
    pub const fn seller_id(&self) -> Option<SellerId> {
        match self.role {
            Role::Seller => Some(SellerId::from_uuid(self.id)),
            Role::Admin => None,
        }
    }

    /// Returns a copy carrying the seller's current balance.
    #[must_use]
    pub fn with_balance(mut self, seller: &Seller) -> Self {
        if self.seller_id() == Some(seller.id) {
            self.credits = Some(seller.credits);
            self.username.clone_from(&seller.username);
        }
        self
    }
}
