//! Category entity

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::{Name, ValidationError};

/// Category row
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Unset until the first update
    pub updated_at: Option<DateTime<Utc>>,
}

/// Mutable fields of a category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: Name,
}

impl CategoryDraft {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: Name::new("name", name)?,
        })
    }
}
