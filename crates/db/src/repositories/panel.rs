//! PostgreSQL implementation of `PanelStore`.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::debug;

use reseller_core::store::{
    Admin, EndUser, EndUserChanges, EndUserWithSeller, NewEndUser, NewSeller, PanelStore, Seller,
    StoreError,
};
use reseller_shared::types::{AdminId, EndUserId, SellerId};

use super::convert::{store_error, to_admin, to_end_user, to_seller};
use crate::entities::{admins, end_users, sellers};

/// Panel repository over a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct PanelRepository {
    db: DatabaseConnection,
}

impl PanelRepository {
    /// Creates a new panel repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl PanelStore for PanelRepository {
    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(to_admin))
    }

    async fn find_seller_by_username(&self, username: &str) -> Result<Option<Seller>, StoreError> {
        let model = sellers::Entity::find()
            .filter(sellers::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(to_seller))
    }

    async fn find_seller(&self, id: SellerId) -> Result<Option<Seller>, StoreError> {
        let model = sellers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(to_seller))
    }

    async fn list_sellers_by_admin(&self, admin_id: AdminId) -> Result<Vec<Seller>, StoreError> {
        let models = sellers::Entity::find()
            .filter(sellers::Column::AdminId.eq(admin_id.into_inner()))
            .order_by_desc(sellers::Column::CreatedAt)
            .order_by_desc(sellers::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(to_seller).collect())
    }

    async fn insert_seller(&self, seller: NewSeller) -> Result<Seller, StoreError> {
        let now = Utc::now().into();
        let model = sellers::ActiveModel {
            id: Set(SellerId::new().into_inner()),
            username: Set(seller.username),
            password_hash: Set(seller.password_hash),
            credits: Set(seller.credits),
            admin_id: Set(seller.admin_id.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(&self.db).await.map(to_seller).map_err(store_error)
    }

    async fn set_seller_credits(
        &self,
        id: SellerId,
        credits: i64,
    ) -> Result<Option<Seller>, StoreError> {
        let models = sellers::Entity::update_many()
            .col_expr(sellers::Column::Credits, Expr::value(credits))
            .col_expr(sellers::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(sellers::Column::Id.eq(id.into_inner()))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().next().map(to_seller))
    }

    async fn debit_seller_credits(
        &self,
        id: SellerId,
        amount: i64,
    ) -> Result<Option<Seller>, StoreError> {
        // Check and write in one statement; an empty result means no row
        // satisfied the balance predicate.
        let models = sellers::Entity::update_many()
            .col_expr(
                sellers::Column::Credits,
                Expr::col(sellers::Column::Credits).sub(amount),
            )
            .col_expr(sellers::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(sellers::Column::Id.eq(id.into_inner()))
            .filter(sellers::Column::Credits.gte(amount))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        if models.is_empty() {
            debug!(seller_id = %id, amount = amount, "Conditional debit matched no row");
        }
        Ok(models.into_iter().next().map(to_seller))
    }

    async fn delete_seller(&self, id: SellerId) -> Result<u64, StoreError> {
        let result = sellers::Entity::delete_many()
            .filter(sellers::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected)
    }

    async fn list_end_users_by_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<EndUser>, StoreError> {
        let models = end_users::Entity::find()
            .filter(end_users::Column::SellerId.eq(seller_id.into_inner()))
            .order_by_desc(end_users::Column::CreatedAt)
            .order_by_desc(end_users::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(to_end_user).collect())
    }

    async fn list_all_end_users(&self) -> Result<Vec<EndUserWithSeller>, StoreError> {
        let rows = end_users::Entity::find()
            .find_also_related(sellers::Entity)
            .order_by_desc(end_users::Column::CreatedAt)
            .order_by_desc(end_users::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|(end_user, seller)| EndUserWithSeller {
                end_user: to_end_user(end_user),
                seller_username: seller.map(|s| s.username),
            })
            .collect())
    }

    async fn insert_end_user(&self, end_user: NewEndUser) -> Result<EndUser, StoreError> {
        let now = Utc::now().into();
        let model = end_users::ActiveModel {
            id: Set(EndUserId::new().into_inner()),
            username: Set(end_user.username),
            password_hash: Set(end_user.password_hash),
            seller_id: Set(end_user.seller_id.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(&self.db).await.map(to_end_user).map_err(store_error)
    }

    async fn update_end_user(
        &self,
        id: EndUserId,
        seller_id: SellerId,
        changes: EndUserChanges,
    ) -> Result<Option<EndUser>, StoreError> {
        let mut update = end_users::Entity::update_many()
            .col_expr(end_users::Column::UpdatedAt, Expr::value(Utc::now()));
        if let Some(username) = changes.username {
            update = update.col_expr(end_users::Column::Username, Expr::value(username));
        }
        if let Some(password_hash) = changes.password_hash {
            update = update.col_expr(end_users::Column::PasswordHash, Expr::value(password_hash));
        }

        let models = update
            .filter(end_users::Column::Id.eq(id.into_inner()))
            .filter(end_users::Column::SellerId.eq(seller_id.into_inner()))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().next().map(to_end_user))
    }

    async fn delete_end_user(&self, id: EndUserId, seller_id: SellerId) -> Result<u64, StoreError> {
        let result = end_users::Entity::delete_many()
            .filter(end_users::Column::Id.eq(id.into_inner()))
            .filter(end_users::Column::SellerId.eq(seller_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected)
    }

    async fn delete_end_users_by_seller(&self, seller_id: SellerId) -> Result<u64, StoreError> {
        let result = end_users::Entity::delete_many()
            .filter(end_users::Column::SellerId.eq(seller_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected)
    }
}
