//! Seller credit ledger.
//!
//! The only component that mutates `sellers.credits`. Balances move by two
//! operations: an admin setting an absolute value, and a conditional
//! decrement when an end user is provisioned.

mod service;

#[cfg(test)]
mod service_props;

pub use service::SellerLedger;
