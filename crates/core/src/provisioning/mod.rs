//! Provisioning coordinator.
//!
//! Creating an end user costs its seller one credit. The store has no
//! multi-row transactions, so the two writes (insert the end user, debit the
//! seller) are sequenced here and the insert is undone if the debit fails.
//! Seller deletion and end-user edits live here too because they touch rows
//! across both tables.

mod service;
mod types;

#[cfg(test)]
mod service_props;

pub use service::ProvisioningCoordinator;
pub use types::{Provisioned, ProvisioningReport, ProvisioningState, SellerDeletion};
