//! Role repository

use async_trait::async_trait;
use sqlx::PgPool;

use super::{begin_read_only, DbError, Repository};
use crate::models::{Pagination, Paginated, Role, RoleDraft};

/// Role repository
#[derive(Clone)]
pub struct RoleRepo {
    pool: PgPool,
}

impl RoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for RoleRepo {
    type Entity = Role;
    type Draft = RoleDraft;

    const RESOURCE: &'static str = "role";

    async fn find_all(&self) -> Result<Vec<Role>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;
        let rows: Vec<Role> = sqlx::query_as("SELECT id, authority FROM roles ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn find_page(&self, page: Pagination) -> Result<Paginated<Role>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
            .fetch_one(&mut *tx)
            .await?;

        let items: Vec<Role> =
            sqlx::query_as("SELECT id, authority FROM roles ORDER BY id LIMIT $1 OFFSET $2")
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(Paginated::new(items, total, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, DbError> {
        let row = sqlx::query_as("SELECT id, authority FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, draft: RoleDraft) -> Result<Role, DbError> {
        let row = sqlx::query_as(
            "INSERT INTO roles (authority) VALUES ($1) RETURNING id, authority",
        )
        .bind(draft.authority.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, draft: RoleDraft) -> Result<Role, DbError> {
        sqlx::query_as("UPDATE roles SET authority = $1 WHERE id = $2 RETURNING id, authority")
            .bind(draft.authority.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            })
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            });
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, DbError> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
