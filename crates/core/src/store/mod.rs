//! The storage collaborator seen from the domain.
//!
//! `PanelStore` is the port the db crate implements. It exposes per-table
//! select/insert/update/delete with equality predicates and newest-first
//! ordering, plus one conditional update for debiting credits. It does not
//! expose multi-row transactions; the domain is written to work without them.

mod error;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use std::future::Future;

pub use error::StoreError;
pub use types::{Admin, EndUser, EndUserChanges, EndUserWithSeller, NewEndUser, NewSeller, Seller};

use reseller_shared::types::{AdminId, EndUserId, SellerId};

/// Repository trait over the `admins`, `sellers` and `end_users` tables.
///
/// Implemented by the db crate against PostgreSQL and by `memory::MemoryStore`
/// for tests.
pub trait PanelStore: Send + Sync {
    /// Finds an admin by username.
    fn find_admin_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Admin>, StoreError>> + Send;

    /// Finds a seller by username.
    fn find_seller_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Seller>, StoreError>> + Send;

    /// Finds a seller by ID.
    fn find_seller(
        &self,
        id: SellerId,
    ) -> impl Future<Output = Result<Option<Seller>, StoreError>> + Send;

    /// Lists the sellers administered by `admin_id`, newest first.
    fn list_sellers_by_admin(
        &self,
        admin_id: AdminId,
    ) -> impl Future<Output = Result<Vec<Seller>, StoreError>> + Send;

    /// Inserts a seller and returns the stored row.
    fn insert_seller(
        &self,
        seller: NewSeller,
    ) -> impl Future<Output = Result<Seller, StoreError>> + Send;

    /// Sets a seller's balance. Returns `None` if no row has this ID.
    fn set_seller_credits(
        &self,
        id: SellerId,
        credits: i64,
    ) -> impl Future<Output = Result<Option<Seller>, StoreError>> + Send;

    /// Subtracts `amount` credits in a single conditional update
    /// (`WHERE id = ? AND credits >= amount`).
    ///
    /// Returns `None` when no row matched: either the seller does not exist
    /// or its balance cannot cover `amount`.
    fn debit_seller_credits(
        &self,
        id: SellerId,
        amount: i64,
    ) -> impl Future<Output = Result<Option<Seller>, StoreError>> + Send;

    /// Deletes a seller row. Returns the number of rows removed.
    fn delete_seller(&self, id: SellerId) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Lists the end users owned by `seller_id`, newest first.
    fn list_end_users_by_seller(
        &self,
        seller_id: SellerId,
    ) -> impl Future<Output = Result<Vec<EndUser>, StoreError>> + Send;

    /// Lists every end user with its seller's username, newest first.
    fn list_all_end_users(
        &self,
    ) -> impl Future<Output = Result<Vec<EndUserWithSeller>, StoreError>> + Send;

    /// Inserts an end user and returns the stored row.
    fn insert_end_user(
        &self,
        end_user: NewEndUser,
    ) -> impl Future<Output = Result<EndUser, StoreError>> + Send;

    /// Applies `changes` to the end user matching both `id` and `seller_id`.
    /// Returns `None` if no such row exists.
    fn update_end_user(
        &self,
        id: EndUserId,
        seller_id: SellerId,
        changes: EndUserChanges,
    ) -> impl Future<Output = Result<Option<EndUser>, StoreError>> + Send;

    /// Deletes the end user matching both `id` and `seller_id`.
    fn delete_end_user(
        &self,
        id: EndUserId,
        seller_id: SellerId,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Deletes every end user owned by `seller_id`.
    fn delete_end_users_by_seller(
        &self,
        seller_id: SellerId,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
