//! catalog-server: catalog backend over PostgreSQL
//!
//! Three layers, wired top-down:
//! - [`http`]: axum routes mapping verbs/paths to service calls
//! - [`service`]: per-entity CRUD, translating missing rows into NotFound and
//!   integrity violations into Conflict
//! - [`db`]: the generic [`Repository`](db::repos::Repository) contract and its
//!   PostgreSQL implementations

pub mod db;
pub mod http;
pub mod models;
pub mod service;
pub mod state;

pub use db::repos::{DbError, Repository};
pub use http::{build_router, run_server, ServerConfig};
pub use service::{CrudService, ServiceError};
pub use state::AppState;
