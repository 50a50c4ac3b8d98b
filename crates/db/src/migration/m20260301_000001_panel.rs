//! Panel schema: admins, sellers and end users.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(PANEL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS end_users CASCADE;
             DROP TABLE IF EXISTS sellers CASCADE;
             DROP TABLE IF EXISTS admins CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const PANEL_SQL: &str = r"
-- Admins are created out-of-band (seeder)
CREATE TABLE admins (
    id UUID PRIMARY KEY,
    username VARCHAR(100) NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_admins_username UNIQUE (username)
);

CREATE TABLE sellers (
    id UUID PRIMARY KEY,
    username VARCHAR(100) NOT NULL,
    password_hash TEXT NOT NULL,
    credits BIGINT NOT NULL DEFAULT 0,
    admin_id UUID NOT NULL REFERENCES admins(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_sellers_username UNIQUE (username),
    CONSTRAINT chk_sellers_credits_non_negative CHECK (credits >= 0)
);

CREATE INDEX idx_sellers_admin ON sellers(admin_id, created_at DESC);

-- End-user usernames are unique system-wide
CREATE TABLE end_users (
    id UUID PRIMARY KEY,
    username VARCHAR(100) NOT NULL,
    password_hash TEXT NOT NULL,
    seller_id UUID NOT NULL REFERENCES sellers(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_end_users_username UNIQUE (username)
);

CREATE INDEX idx_end_users_seller ON end_users(seller_id, created_at DESC);
CREATE INDEX idx_end_users_created ON end_users(created_at DESC);
";
