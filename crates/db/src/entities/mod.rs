//! `SeaORM` entities for the panel tables.

pub mod admins;
pub mod end_users;
pub mod sellers;

pub mod prelude {
    //! Entity re-exports.
    pub use super::admins::Entity as Admins;
    pub use super::end_users::Entity as EndUsers;
    pub use super::sellers::Entity as Sellers;
}
