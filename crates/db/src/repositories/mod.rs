//! Repository implementations for database operations.

mod admin;
mod convert;
mod panel;

pub use admin::AdminRepository;
pub use panel::PanelRepository;
