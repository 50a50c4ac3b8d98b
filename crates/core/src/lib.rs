//! Core business logic for the reseller panel.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached through the `PanelStore` port, implemented by the db crate.
//!
//! # Modules
//!
//! - `auth` - Roles, principals and credential hashing
//! - `identity` - Login against the per-role account tables
//! - `ledger` - Seller credit balances
//! - `provisioning` - End-user provisioning with compensation, seller cascade
//! - `access` - Role- and owner-scoped entry points
//! - `store` - Storage port and row types

pub mod access;
pub mod auth;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod provisioning;
pub mod store;

pub use access::{AdminOverview, ScopedPanel};
pub use auth::{Argon2Verifier, CredentialVerifier, PasswordError, Principal, Role};
pub use error::PanelError;
pub use ledger::SellerLedger;
pub use provisioning::{Provisioned, ProvisioningCoordinator, ProvisioningReport, ProvisioningState, SellerDeletion};
pub use store::{PanelStore, StoreError};
