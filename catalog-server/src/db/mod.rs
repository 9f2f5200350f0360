//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool (default 5 connections), cloned into each repository
//! - Rely on DB constraints, translate violations - no check-then-delete
//! - Transactions for multi-statement operations

pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
