//! Row types exchanged with the storage collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reseller_shared::types::{AdminId, EndUserId, SellerId};

/// Administrator account. Created out-of-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    /// Admin ID.
    pub id: AdminId,
    /// Login name, unique among admins.
    pub username: String,
    /// Stored credential.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Seller account with its credit balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    /// Seller ID.
    pub id: SellerId,
    /// Login name, unique among sellers.
    pub username: String,
    /// Stored credential.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Remaining credits; never negative.
    pub credits: i64,
    /// Administering admin.
    pub admin_id: AdminId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// End-user account provisioned by a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndUser {
    /// End-user ID.
    pub id: EndUserId,
    /// Login name.
    pub username: String,
    /// Stored credential.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Owning seller.
    pub seller_id: SellerId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// End user joined with its seller's username, for the admin overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndUserWithSeller {
    /// The end user.
    #[serde(flatten)]
    pub end_user: EndUser,
    /// Username of the owning seller, if the seller row still exists.
    pub seller_username: Option<String>,
}

/// Insert payload for a seller.
#[derive(Debug, Clone)]
pub struct NewSeller {
    /// Login name.
    pub username: String,
    /// Already-hashed credential.
    pub password_hash: String,
    /// Opening balance.
    pub credits: i64,
    /// Administering admin.
    pub admin_id: AdminId,
}

/// Insert payload for an end user.
#[derive(Debug, Clone)]
pub struct NewEndUser {
    /// Login name.
    pub username: String,
    /// Already-hashed credential.
    pub password_hash: String,
    /// Owning seller.
    pub seller_id: SellerId,
}

/// Column changes for an end-user update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndUserChanges {
    /// New login name.
    pub username: Option<String>,
    /// New already-hashed credential.
    pub password_hash: Option<String>,
}
