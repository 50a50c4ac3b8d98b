//! Session token claims and the request/response payloads shared by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// The token identifies who is logged in and under which role. Seller
/// balances are never carried here; they are refreshed from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin or seller ID).
    pub sub: Uuid,
    /// Login name at the time the token was issued.
    pub username: String,
    /// Role the subject authenticated as (`admin` or `seller`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an authenticated account.
    #[must_use]
    pub fn new(subject: Uuid, username: &str, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: subject,
            username: username.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the subject ID from claims.
    #[must_use]
    pub const fn subject(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Table to authenticate against (`admin` or `seller`).
    pub role: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated principal.
    pub principal: PrincipalInfo,
    /// Access token.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// Principal info returned in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrincipalInfo {
    /// Account ID.
    pub id: Uuid,
    /// Account username.
    pub username: String,
    /// `admin` or `seller`.
    pub role: String,
    /// Current credit balance (sellers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<i64>,
}

/// Create seller request (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSellerRequest {
    /// Seller username.
    pub username: String,
    /// Seller password.
    pub password: String,
    /// Opening credit balance.
    #[serde(default)]
    pub credits: i64,
}

/// Set a seller's balance (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSellerCreditsRequest {
    /// New absolute credit balance.
    pub credits: i64,
}

/// Provision an end user (seller only).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEndUserRequest {
    /// End-user username.
    pub username: String,
    /// End-user password.
    pub password: String,
}

/// Update an end user (seller only).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEndUserRequest {
    /// New username.
    pub username: String,
    /// New password; empty or absent leaves the stored one unchanged.
    #[serde(default)]
    pub password: Option<String>,
}
