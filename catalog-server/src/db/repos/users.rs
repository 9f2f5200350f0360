//! User repository
//!
//! Users carry their roles through `user_roles`, loaded and written the same
//! way products carry categories.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};

use super::{begin_read_only, first_missing_id, DbError, Repository};
use crate::models::{Pagination, Paginated, Role, User, UserDraft, ValidationError};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}

#[derive(Debug, FromRow)]
struct UserRoleRow {
    user_id: i64,
    #[sqlx(flatten)]
    role: Role,
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password";

/// User repository
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn attach_roles(conn: &mut PgConnection, rows: Vec<UserRow>) -> Result<Vec<User>, DbError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let links: Vec<UserRoleRow> = sqlx::query_as(
        r#"
        SELECT ur.user_id, r.id, r.authority
        FROM user_roles ur
        JOIN roles r ON r.id = ur.role_id
        WHERE ur.user_id = ANY($1)
        ORDER BY ur.user_id, r.id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_user: HashMap<i64, Vec<Role>> = HashMap::new();
    for link in links {
        by_user.entry(link.user_id).or_default().push(link.role);
    }

    Ok(rows
        .into_iter()
        .map(|r| User {
            roles: by_user.remove(&r.id).unwrap_or_default(),
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            password_hash: r.password,
        })
        .collect())
}

async fn fetch_one(conn: &mut PgConnection, id: i64) -> Result<Option<User>, DbError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let row: Option<UserRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(attach_roles(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

async fn write_roles(conn: &mut PgConnection, user_id: i64, role_ids: &[i64]) -> Result<(), DbError> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    if !role_ids.is_empty() {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) SELECT $1, UNNEST($2::BIGINT[])")
            .bind(user_id)
            .bind(role_ids)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl Repository for UserRepo {
    type Entity = User;
    type Draft = UserDraft;

    const RESOURCE: &'static str = "user";

    async fn find_all(&self) -> Result<Vec<User>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(&mut *tx).await?;
        let users = attach_roles(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(users)
    }

    async fn find_page(&self, page: Pagination) -> Result<Paginated<User>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *tx)
            .await?;

        let items = attach_roles(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(Paginated::new(items, total, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;
        let user = fetch_one(&mut tx, id).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn insert(&self, draft: UserDraft) -> Result<User, DbError> {
        let password_hash = draft
            .password_hash
            .as_deref()
            .ok_or(ValidationError::Empty { field: "password" })?;

        let mut tx = self.pool.begin().await?;

        if let Some(missing) = first_missing_id(&mut tx, "roles", &draft.role_ids).await? {
            return Err(DbError::NotFound {
                resource: "role",
                id: missing.to_string(),
            });
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (first_name, last_name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(draft.first_name.as_str())
        .bind(draft.last_name.as_str())
        .bind(draft.email.as_str())
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await?;

        write_roles(&mut tx, id, &draft.role_ids).await?;

        let user = fetch_one(&mut tx, id)
            .await?
            .ok_or(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            })?;

        tx.commit().await?;
        Ok(user)
    }

    async fn update(&self, id: i64, draft: UserDraft) -> Result<User, DbError> {
        let mut tx = self.pool.begin().await?;

        // A missing hash keeps the stored password
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET first_name = $1, last_name = $2, email = $3,
                password = COALESCE($4, password)
            WHERE id = $5
            RETURNING id
            "#,
        )
        .bind(draft.first_name.as_str())
        .bind(draft.last_name.as_str())
        .bind(draft.email.as_str())
        .bind(draft.password_hash.as_deref())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            });
        }

        if let Some(missing) = first_missing_id(&mut tx, "roles", &draft.role_ids).await? {
            return Err(DbError::NotFound {
                resource: "role",
                id: missing.to_string(),
            });
        }

        write_roles(&mut tx, id, &draft.role_ids).await?;

        let user = fetch_one(&mut tx, id)
            .await?
            .ok_or(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            })?;

        tx.commit().await?;
        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
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
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
