//! Read models returned by the access layer.

use serde::{Deserialize, Serialize};

/// Summary figures for an admin's landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOverview {
    /// Sellers administered by the caller.
    pub seller_count: u64,
    /// End users across the whole system.
    pub end_user_count: u64,
    /// Sum of the balances of the caller's sellers.
    pub total_credits: i64,
}
