//! Repository contract and its PostgreSQL implementations
//!
//! Each repository follows these patterns:
//! - Default CRUD only, no bespoke queries
//! - Related rows are loaded with one `= ANY($1)` query per page (no N+1)
//! - Entity row + link rows are written in a single transaction
//! - Referential integrity is left to the store; violations surface as
//!   [`DbError::IntegrityViolation`]

pub mod categories;
pub mod products;
pub mod roles;
pub mod users;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{Pagination, Paginated, ValidationError};

pub use categories::CategoryRepo;
pub use products::ProductRepo;
pub use roles::RoleRepo;
pub use users::UserRepo;

/// Store-level failure
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    /// Update or delete matched no row
    #[error("no {resource} row with id {id}")]
    EmptyResult { resource: &'static str, id: i64 },

    /// Foreign key or unique constraint rejected the statement
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    /// A related row named by a draft does not exist
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// The draft lacks a value the table requires
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_foreign_key_violation() || db.is_unique_violation() {
                return Self::IntegrityViolation(db.message().to_owned());
            }
        }
        Self::Sqlx(e)
    }
}

/// Generic CRUD contract over one entity table.
///
/// `Draft` carries every mutable field; `update` is a full replacement.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    type Entity: Send + 'static;
    type Draft: Send + 'static;

    /// Resource name used in errors and logs
    const RESOURCE: &'static str;

    /// All rows ordered by id.
    async fn find_all(&self) -> Result<Vec<Self::Entity>, DbError>;

    /// One page of rows ordered by id, with the total row count.
    async fn find_page(&self, page: Pagination) -> Result<Paginated<Self::Entity>, DbError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Self::Entity>, DbError>;

    /// Insert a new row; the store assigns the id.
    async fn insert(&self, draft: Self::Draft) -> Result<Self::Entity, DbError>;

    /// Overwrite the row's mutable fields.
    ///
    /// Fails with [`DbError::EmptyResult`] when no row has `id`.
    async fn update(&self, id: i64, draft: Self::Draft) -> Result<Self::Entity, DbError>;

    /// Fails with [`DbError::EmptyResult`] when no row has `id`, and with
    /// [`DbError::IntegrityViolation`] when other rows still reference it.
    async fn delete_by_id(&self, id: i64) -> Result<(), DbError>;

    async fn count(&self) -> Result<i64, DbError>;
}

/// Open a read-only transaction for reads spanning several statements.
pub(crate) async fn begin_read_only(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, DbError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Return the first id in `wanted` that is not present in `table`.
pub(crate) async fn first_missing_id(
    tx: &mut Transaction<'static, Postgres>,
    table: &'static str,
    wanted: &[i64],
) -> Result<Option<i64>, DbError> {
    if wanted.is_empty() {
        return Ok(None);
    }

    let sql = format!("SELECT id FROM {table} WHERE id = ANY($1)");
    let found: Vec<i64> = sqlx::query_scalar(&sql)
        .bind(wanted)
        .fetch_all(&mut **tx)
        .await?;

    Ok(wanted.iter().copied().find(|id| !found.contains(id)))
}
