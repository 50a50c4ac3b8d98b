//! Admin repository.
//!
//! Admins are not created through the panel. The seeder uses this
//! repository to bootstrap the first account.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use reseller_core::store::{Admin, StoreError};
use reseller_shared::types::AdminId;

use super::convert::{store_error, to_admin};
use crate::entities::admins;

/// Admin repository for bootstrap operations.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    db: DatabaseConnection,
}

impl AdminRepository {
    /// Creates a new admin repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an admin by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(to_admin))
    }

    /// Creates an admin with an already hashed password.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the username is taken.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<Admin, StoreError> {
        let admin = admins::ActiveModel {
            id: Set(AdminId::new().into_inner()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(Utc::now().into()),
        };

        admin.insert(&self.db).await.map(to_admin).map_err(store_error)
    }
}
