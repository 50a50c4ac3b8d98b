//! Panel error taxonomy.
//!
//! One enum for every failure a panel operation can surface. Provisioning
//! failures are split by how far the operation got so callers can tell
//! "nothing happened" from "something may be left behind".

use thiserror::Error;

use reseller_shared::types::{EndUserId, SellerId};

use crate::store::StoreError;

/// Errors returned by panel operations.
#[derive(Debug, Error)]
pub enum PanelError {
    // ========== Authentication / Authorization ==========
    /// No account matches the supplied role, username and password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The principal is not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ========== Validation ==========
    /// A request argument was rejected before touching storage.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The target row does not exist in the principal's scope.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness or integrity rule rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    // ========== Provisioning ==========
    /// The seller cannot cover the cost of another end user.
    #[error("Insufficient credits for seller {seller_id}: {available} available")]
    InsufficientCredits {
        /// Seller that attempted the provision.
        seller_id: SellerId,
        /// Balance observed when the attempt was refused.
        available: i64,
    },

    /// The end-user insert failed; nothing was written.
    #[error("Failed to create end user: {0}")]
    InsertFailed(StoreError),

    /// The debit failed after the end user was inserted, and the insert was
    /// rolled back.
    #[error("Failed to debit credit for seller {seller_id}: {reason}")]
    CreditDebitFailed {
        /// Seller whose balance could not be debited.
        seller_id: SellerId,
        /// What went wrong with the debit.
        reason: String,
    },

    /// The debit failed and so did the rollback of the insert. An end user
    /// now exists without a matching credit debit.
    #[error(
        "End user {end_user_id} exists without a credit debit for seller {seller_id}: \
         debit failed ({debit_error}), rollback failed ({compensation_error})"
    )]
    CompensationFailed {
        /// The end user that was left behind.
        end_user_id: EndUserId,
        /// The seller that owns it.
        seller_id: SellerId,
        /// Why the debit failed.
        debit_error: String,
        /// Why the rollback failed.
        compensation_error: String,
    },

    // ========== Infrastructure ==========
    /// The storage collaborator failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PanelError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::InsufficientCredits { .. } => "INSUFFICIENT_CREDITS",
            Self::InsertFailed(_) => "INSERT_FAILED",
            Self::CreditDebitFailed { .. } => "CREDIT_DEBIT_FAILED",
            Self::CompensationFailed { .. } => "COMPENSATION_FAILED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::InvalidCredentials => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InsertFailed(cause) if cause.is_conflict() => 409,
            Self::InsufficientCredits { .. } => 422,
            Self::InsertFailed(_)
            | Self::CreditDebitFailed { .. }
            | Self::CompensationFailed { .. }
            | Self::Storage(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Whether an operator has to look at this failure.
    ///
    /// True only when storage may hold an end user whose credit was never
    /// debited.
    #[must_use]
    pub const fn is_operational_alert(&self) -> bool {
        matches!(self, Self::CompensationFailed { .. })
    }
}

impl From<StoreError> for PanelError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}
