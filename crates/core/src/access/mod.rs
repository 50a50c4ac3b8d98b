//! Role-gated entry points.
//!
//! Every operation takes the caller's `Principal` explicitly. Scope checks
//! run before any query, so a wrong-role or wrong-owner call never reaches
//! storage.

mod service;
mod types;


pub use service::ScopedPanel;
pub use types::AdminOverview;
