//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::db::repos::{CategoryRepo, ProductRepo, RoleRepo, UserRepo};
use crate::service::{CategoryService, ProductService, RoleService, UserService};

/// One service per entity, each wired with its repository over the shared pool
///
/// Handlers extract only the service they need (`State<Arc<CategoryService>>`).
#[derive(Clone, FromRef)]
pub struct AppState {
    pub categories: Arc<CategoryService>,
    pub products: Arc<ProductService>,
    pub roles: Arc<RoleService>,
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(CategoryRepo::new(pool.clone()))),
            products: Arc::new(ProductService::new(ProductRepo::new(pool.clone()))),
            roles: Arc::new(RoleService::new(RoleRepo::new(pool.clone()))),
            users: Arc::new(UserService::new(UserRepo::new(pool))),
        }
    }
}
