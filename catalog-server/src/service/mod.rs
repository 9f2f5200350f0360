//! Per-entity services over the generic repository contract
//!
//! The service is the only place where store outcomes become domain errors:
//! - a missing row becomes [`ServiceError::NotFound`]
//! - a referential-integrity violation becomes [`ServiceError::Conflict`]
//! - anything else propagates as [`ServiceError::Database`]

pub mod users;

use crate::db::repos::{CategoryRepo, DbError, ProductRepo, Repository, RoleRepo, UserRepo};
use crate::models::{Pagination, Paginated, ValidationError};

pub use users::{hash_password, verify_password};

pub type CategoryService = CrudService<CategoryRepo>;
pub type ProductService = CrudService<ProductRepo>;
pub type RoleService = CrudService<RoleRepo>;
pub type UserService = CrudService<UserRepo>;

/// Domain error surfaced by services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{resource} id {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("integrity violation: {0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(ValidationError),

    #[error(transparent)]
    Database(DbError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::EmptyResult { resource, id } => Self::NotFound {
                resource,
                id: id.to_string(),
            },
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::IntegrityViolation(detail) => Self::Conflict(detail),
            DbError::Invalid(e) => Self::Validation(e),
            other => Self::Database(other),
        }
    }
}

/// CRUD use cases for one entity, wired explicitly with its repository.
pub struct CrudService<R> {
    repo: R,
}

impl<R: Repository> CrudService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Every record, unconditionally.
    pub async fn find_all(&self) -> Result<Vec<R::Entity>, ServiceError> {
        tracing::debug!(resource = R::RESOURCE, "find_all");
        Ok(self.repo.find_all().await?)
    }

    /// One page, delegated once to the store's paged read.
    pub async fn find_all_paged(
        &self,
        page: Pagination,
    ) -> Result<Paginated<R::Entity>, ServiceError> {
        tracing::debug!(
            resource = R::RESOURCE,
            page = page.page,
            per_page = page.per_page,
            "find_all_paged"
        );
        Ok(self.repo.find_page(page).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<R::Entity, ServiceError> {
        tracing::debug!(resource = R::RESOURCE, id, "find_by_id");
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<R>(id))
    }

    pub async fn insert(&self, draft: R::Draft) -> Result<R::Entity, ServiceError> {
        tracing::debug!(resource = R::RESOURCE, "insert");
        self.repo.insert(draft).await.map_err(|e| translate::<R>(e, None))
    }

    /// Overwrite the record's fields. NotFound leaves the store untouched.
    pub async fn update(&self, id: i64, draft: R::Draft) -> Result<R::Entity, ServiceError> {
        tracing::debug!(resource = R::RESOURCE, id, "update");
        self.repo
            .update(id, draft)
            .await
            .map_err(|e| translate::<R>(e, Some(id)))
    }

    /// Remove the record. Conflict when other rows still reference it.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        tracing::debug!(resource = R::RESOURCE, id, "delete");
        self.repo
            .delete_by_id(id)
            .await
            .map_err(|e| translate::<R>(e, Some(id)))
    }

    pub async fn count(&self) -> Result<i64, ServiceError> {
        Ok(self.repo.count().await?)
    }
}

fn not_found<R: Repository>(id: i64) -> ServiceError {
    tracing::warn!(resource = R::RESOURCE, id, "not found");
    ServiceError::NotFound {
        resource: R::RESOURCE,
        id: id.to_string(),
    }
}

fn translate<R: Repository>(e: DbError, id: Option<i64>) -> ServiceError {
    let err = ServiceError::from(e);
    match &err {
        ServiceError::NotFound { resource, id: missing } => {
            tracing::warn!(resource = R::RESOURCE, missing = %resource, id = %missing, "not found");
        }
        ServiceError::Conflict(detail) => {
            tracing::warn!(resource = R::RESOURCE, id = ?id, %detail, "integrity violation");
        }
        _ => {}
    }
    err
}
