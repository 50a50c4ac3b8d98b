//! Row and error conversions between `SeaORM` and the core store types.

use chrono::Utc;
use sea_orm::{DbErr, SqlErr};

use reseller_core::store::{Admin, EndUser, Seller, StoreError};
use reseller_shared::types::{AdminId, EndUserId, SellerId};

use crate::entities::{admins, end_users, sellers};

/// Maps a database error into the store's error kinds.
///
/// Unique, foreign-key and check violations are conflicts; connection
/// failures mean the store is unavailable.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg)) =
        err.sql_err()
    {
        return StoreError::Conflict(msg);
    }

    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => StoreError::Unavailable(err.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("violates check constraint") {
                StoreError::Conflict(msg)
            } else {
                StoreError::Query(msg)
            }
        }
    }
}

pub(crate) fn to_admin(model: admins::Model) -> Admin {
    Admin {
        id: AdminId::from_uuid(model.id),
        username: model.username,
        password_hash: model.password_hash,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn to_seller(model: sellers::Model) -> Seller {
    Seller {
        id: SellerId::from_uuid(model.id),
        username: model.username,
        password_hash: model.password_hash,
        credits: model.credits,
        admin_id: AdminId::from_uuid(model.admin_id),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn to_end_user(model: end_users::Model) -> EndUser {
    EndUser {
        id: EndUserId::from_uuid(model.id),
        username: model.username,
        password_hash: model.password_hash,
        seller_id: SellerId::from_uuid(model.seller_id),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
