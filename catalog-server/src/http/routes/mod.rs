//! Route handlers organized by resource

pub mod health;
pub mod categories;
pub mod products;
pub mod roles;
pub mod users;

use serde::{Deserialize, Serialize};

/// Reference to a related row by id, e.g. `{"id": 3}` in a product's
/// `categories` list
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}
