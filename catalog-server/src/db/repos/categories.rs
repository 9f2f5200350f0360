//! Category repository

use async_trait::async_trait;
use sqlx::PgPool;

use super::{begin_read_only, DbError, Repository};
use crate::models::{Category, CategoryDraft, Pagination, Paginated};

/// Category repository
#[derive(Clone)]
pub struct CategoryRepo {
    pool: PgPool,
}

impl CategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for CategoryRepo {
    type Entity = Category;
    type Draft = CategoryDraft;

    const RESOURCE: &'static str = "category";

    async fn find_all(&self) -> Result<Vec<Category>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;
        let rows: Vec<Category> = sqlx::query_as(
            "SELECT id, name, created_at, updated_at FROM categories ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn find_page(&self, page: Pagination) -> Result<Paginated<Category>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await?;

        let items: Vec<Category> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at
            FROM categories
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Paginated::new(items, total, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DbError> {
        let row = sqlx::query_as(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, draft: CategoryDraft) -> Result<Category, DbError> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(draft.name.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, draft: CategoryDraft) -> Result<Category, DbError> {
        sqlx::query_as(
            r#"
            UPDATE categories
            SET name = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(draft.name.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::EmptyResult {
            resource: Self::RESOURCE,
            id,
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
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
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
