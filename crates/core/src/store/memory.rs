//! In-memory `PanelStore` with fault injection.
//!
//! Rows are kept in insertion order, so "newest first" is reverse order.
//! There is no foreign-key cascade here: deleting a seller leaves its end
//! users behind unless the caller removes them, which is exactly what the
//! coordinator's explicit cascade has to cope with.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use reseller_shared::types::{AdminId, EndUserId, SellerId};

use super::{
    Admin, EndUser, EndUserChanges, EndUserWithSeller, NewEndUser, NewSeller, PanelStore, Seller,
    StoreError,
};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `find_admin_by_username`
    FindAdmin,
    /// `find_seller_by_username` and `find_seller`
    FindSeller,
    /// `list_sellers_by_admin`
    ListSellers,
    /// `insert_seller`
    InsertSeller,
    /// `set_seller_credits`
    SetSellerCredits,
    /// `debit_seller_credits`
    DebitSellerCredits,
    /// `delete_seller`
    DeleteSeller,
    /// `list_end_users_by_seller` and `list_all_end_users`
    ListEndUsers,
    /// `insert_end_user`
    InsertEndUser,
    /// `update_end_user`
    UpdateEndUser,
    /// `delete_end_user`
    DeleteEndUser,
    /// `delete_end_users_by_seller`
    DeleteEndUsersBySeller,
}

#[derive(Debug, Default)]
struct State {
    admins: Vec<Admin>,
    sellers: Vec<Seller>,
    end_users: Vec<EndUser>,
    faults: HashSet<StoreOp>,
    calls: Vec<StoreOp>,
}

impl State {
    fn enter(&mut self, op: StoreOp) -> Result<(), StoreError> {
        self.calls.push(op);
        if self.faults.contains(&op) {
            return Err(StoreError::Unavailable(format!("injected fault on {op:?}")));
        }
        Ok(())
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every subsequent call of `op` fail until `heal` is called.
    pub fn fail(&self, op: StoreOp) {
        self.lock().faults.insert(op);
    }

    /// Removes an injected fault.
    pub fn heal(&self, op: StoreOp) {
        self.lock().faults.remove(&op);
    }

    /// Returns the operations called so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreOp> {
        self.lock().calls.clone()
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Inserts an admin directly, bypassing faults.
    pub fn add_admin(&self, username: &str, password_hash: &str) -> Admin {
        let admin = Admin {
            id: AdminId::new(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        self.lock().admins.push(admin.clone());
        admin
    }

    /// Inserts a seller directly, bypassing faults.
    pub fn add_seller(
        &self,
        admin_id: AdminId,
        username: &str,
        password_hash: &str,
        credits: i64,
    ) -> Seller {
        let now = Utc::now();
        let seller = Seller {
            id: SellerId::new(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            credits,
            admin_id,
            created_at: now,
            updated_at: now,
        };
        self.lock().sellers.push(seller.clone());
        seller
    }

    /// Inserts an end user directly, bypassing faults and credits.
    pub fn add_end_user(&self, seller_id: SellerId, username: &str) -> EndUser {
        let now = Utc::now();
        let end_user = EndUser {
            id: EndUserId::new(),
            username: username.to_string(),
            password_hash: String::new(),
            seller_id,
            created_at: now,
            updated_at: now,
        };
        self.lock().end_users.push(end_user.clone());
        end_user
    }

    /// Snapshot of a seller row.
    #[must_use]
    pub fn seller(&self, id: SellerId) -> Option<Seller> {
        self.lock().sellers.iter().find(|s| s.id == id).cloned()
    }

    /// Snapshot of every end-user row, oldest first.
    #[must_use]
    pub fn end_users(&self) -> Vec<EndUser> {
        self.lock().end_users.clone()
    }

    /// Snapshot of an end-user row.
    #[must_use]
    pub fn end_user(&self, id: EndUserId) -> Option<EndUser> {
        self.lock().end_users.iter().find(|u| u.id == id).cloned()
    }
}

impl PanelStore for MemoryStore {
    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::FindAdmin)?;
        Ok(state.admins.iter().find(|a| a.username == username).cloned())
    }

    async fn find_seller_by_username(&self, username: &str) -> Result<Option<Seller>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::FindSeller)?;
        Ok(state.sellers.iter().find(|s| s.username == username).cloned())
    }

    async fn find_seller(&self, id: SellerId) -> Result<Option<Seller>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::FindSeller)?;
        Ok(state.sellers.iter().find(|s| s.id == id).cloned())
    }

    async fn list_sellers_by_admin(&self, admin_id: AdminId) -> Result<Vec<Seller>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::ListSellers)?;
        Ok(state
            .sellers
            .iter()
            .rev()
            .filter(|s| s.admin_id == admin_id)
            .cloned()
            .collect())
    }

    async fn insert_seller(&self, seller: NewSeller) -> Result<Seller, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::InsertSeller)?;
        if seller.credits < 0 {
            return Err(StoreError::Conflict("sellers_credits_check".to_string()));
        }
        if state.sellers.iter().any(|s| s.username == seller.username) {
            return Err(StoreError::Conflict("sellers_username_key".to_string()));
        }
        let now = Utc::now();
        let row = Seller {
            id: SellerId::new(),
            username: seller.username,
            password_hash: seller.password_hash,
            credits: seller.credits,
            admin_id: seller.admin_id,
            created_at: now,
            updated_at: now,
        };
        state.sellers.push(row.clone());
        Ok(row)
    }

    async fn set_seller_credits(
        &self,
        id: SellerId,
        credits: i64,
    ) -> Result<Option<Seller>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::SetSellerCredits)?;
        if credits < 0 {
            return Err(StoreError::Conflict("sellers_credits_check".to_string()));
        }
        Ok(state.sellers.iter_mut().find(|s| s.id == id).map(|s| {
            s.credits = credits;
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn debit_seller_credits(
        &self,
        id: SellerId,
        amount: i64,
    ) -> Result<Option<Seller>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::DebitSellerCredits)?;
        Ok(state
            .sellers
            .iter_mut()
            .find(|s| s.id == id && s.credits >= amount)
            .map(|s| {
                s.credits -= amount;
                s.updated_at = Utc::now();
                s.clone()
            }))
    }

    async fn delete_seller(&self, id: SellerId) -> Result<u64, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::DeleteSeller)?;
        let before = state.sellers.len();
        state.sellers.retain(|s| s.id != id);
        Ok(removed(before, state.sellers.len()))
    }

    async fn list_end_users_by_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<EndUser>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::ListEndUsers)?;
        Ok(state
            .end_users
            .iter()
            .rev()
            .filter(|u| u.seller_id == seller_id)
            .cloned()
            .collect())
    }

    async fn list_all_end_users(&self) -> Result<Vec<EndUserWithSeller>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::ListEndUsers)?;
        Ok(state
            .end_users
            .iter()
            .rev()
            .map(|u| EndUserWithSeller {
                end_user: u.clone(),
                seller_username: state
                    .sellers
                    .iter()
                    .find(|s| s.id == u.seller_id)
                    .map(|s| s.username.clone()),
            })
            .collect())
    }

    async fn insert_end_user(&self, end_user: NewEndUser) -> Result<EndUser, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::InsertEndUser)?;
        if state.end_users.iter().any(|u| u.username == end_user.username) {
            return Err(StoreError::Conflict("end_users_username_key".to_string()));
        }
        let now = Utc::now();
        let row = EndUser {
            id: EndUserId::new(),
            username: end_user.username,
            password_hash: end_user.password_hash,
            seller_id: end_user.seller_id,
            created_at: now,
            updated_at: now,
        };
        state.end_users.push(row.clone());
        Ok(row)
    }

    async fn update_end_user(
        &self,
        id: EndUserId,
        seller_id: SellerId,
        changes: EndUserChanges,
    ) -> Result<Option<EndUser>, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::UpdateEndUser)?;
        if let Some(username) = &changes.username {
            if state
                .end_users
                .iter()
                .any(|u| u.id != id && &u.username == username)
            {
                return Err(StoreError::Conflict("end_users_username_key".to_string()));
            }
        }
        Ok(state
            .end_users
            .iter_mut()
            .find(|u| u.id == id && u.seller_id == seller_id)
            .map(|u| {
                if let Some(username) = changes.username {
                    u.username = username;
                }
                if let Some(password_hash) = changes.password_hash {
                    u.password_hash = password_hash;
                }
                u.updated_at = Utc::now();
                u.clone()
            }))
    }

    async fn delete_end_user(&self, id: EndUserId, seller_id: SellerId) -> Result<u64, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::DeleteEndUser)?;
        let before = state.end_users.len();
        state
            .end_users
            .retain(|u| !(u.id == id && u.seller_id == seller_id));
        Ok(removed(before, state.end_users.len()))
    }

    async fn delete_end_users_by_seller(&self, seller_id: SellerId) -> Result<u64, StoreError> {
        let mut state = self.lock();
        state.enter(StoreOp::DeleteEndUsersBySeller)?;
        let before = state.end_users.len();
        state.end_users.retain(|u| u.seller_id != seller_id);
        Ok(removed(before, state.end_users.len()))
    }
}

fn removed(before: usize, after: usize) -> u64 {
    u64::try_from(before - after).unwrap_or(u64::MAX)
}
