//! Credential checks against the per-role account tables.

mod service;

pub use service::IdentityService;
