//! Provisioning states and results.

use std::fmt;

use serde::Serialize;

use reseller_shared::types::SellerId;

use crate::error::PanelError;
use crate::store::{EndUser, Seller};

/// Where a provisioning attempt stands.
///
/// Valid transitions:
/// - Idle → UserInserted | InsufficientCredits | InsertFailed
/// - UserInserted → CreditDebited | CompensationAttempted
/// - CompensationAttempted → Compensated | CompensationFailed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningState {
    /// Nothing written yet.
    Idle,
    /// The end-user row exists; the debit has not happened.
    UserInserted,
    /// Both writes succeeded.
    CreditDebited,
    /// The debit failed and the insert is being undone.
    CompensationAttempted,
    /// The insert was undone; storage is as before the attempt.
    Compensated,
    /// The insert could not be undone; an unpaid end user exists.
    CompensationFailed,
    /// Refused before any write.
    InsufficientCredits,
    /// The insert failed; nothing was written.
    InsertFailed,
}

impl ProvisioningState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::UserInserted => "user_inserted",
            Self::CreditDebited => "credit_debited",
            Self::CompensationAttempted => "compensation_attempted",
            Self::Compensated => "compensated",
            Self::CompensationFailed => "compensation_failed",
            Self::InsufficientCredits => "insufficient_credits",
            Self::InsertFailed => "insert_failed",
        }
    }

    /// Returns true if the attempt is over.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::CreditDebited
                | Self::Compensated
                | Self::CompensationFailed
                | Self::InsufficientCredits
                | Self::InsertFailed
        )
    }

    /// Returns true if storage matches what it was before the attempt
    /// (or the attempt fully succeeded).
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        !matches!(
            self,
            Self::UserInserted | Self::CompensationAttempted | Self::CompensationFailed
        )
    }

    /// Checks if moving from `from` to `to` is allowed.
    #[must_use]
    pub const fn is_valid_transition(from: Self, to: Self) -> bool {
        matches!(
            (from, to),
            (
                Self::Idle,
                Self::UserInserted | Self::InsufficientCredits | Self::InsertFailed
            ) | (
                Self::UserInserted,
                Self::CreditDebited | Self::CompensationAttempted
            ) | (
                Self::CompensationAttempted,
                Self::Compensated | Self::CompensationFailed
            )
        )
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful provision: the new end user and the seller after the debit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provisioned {
    /// The created end user.
    pub end_user: EndUser,
    /// The seller row with its decremented balance.
    pub seller: Seller,
}

/// Everything that happened during one provisioning attempt.
#[derive(Debug)]
pub struct ProvisioningReport {
    /// States visited, starting with `Idle`.
    pub trail: Vec<ProvisioningState>,
    /// What the caller gets back.
    pub result: Result<Provisioned, PanelError>,
}

impl ProvisioningReport {
    /// The state the attempt ended in.
    #[must_use]
    pub fn state(&self) -> ProvisioningState {
        self.trail.last().copied().unwrap_or(ProvisioningState::Idle)
    }

    /// Discards the trail.
    ///
    /// # Errors
    ///
    /// Returns the attempt's error, if any.
    pub fn into_result(self) -> Result<Provisioned, PanelError> {
        self.result
    }
}

/// Result of deleting a seller and its end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SellerDeletion {
    /// The removed seller.
    pub seller_id: SellerId,
    /// How many end users were removed with it.
    pub end_users_removed: u64,
}
