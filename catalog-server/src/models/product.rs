//! Product entity and its category links

use chrono::{DateTime, Utc};

use super::{Category, Name, ValidationError};

/// Product with the categories it is filed under
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    pub date: DateTime<Utc>,
    /// Ordered by category id
    pub categories: Vec<Category>,
}

/// Mutable fields of a product
///
/// `category_ids` replaces the whole set of links on update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: Name,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    pub date: DateTime<Utc>,
    pub category_ids: Vec<i64>,
}

impl ProductDraft {
    pub fn new(
        name: &str,
        description: impl Into<String>,
        price: f64,
        img_url: impl Into<String>,
        date: DateTime<Utc>,
        category_ids: impl IntoIterator<Item = i64>,
    ) -> Result<Self, ValidationError> {
        let name = Name::new("name", name)?;

        if !price.is_finite() || price <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "price",
                reason: "must be a positive number",
            });
        }

        let mut category_ids: Vec<i64> = category_ids.into_iter().collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        Ok(Self {
            name,
            description: description.into(),
            price,
            img_url: img_url.into().trim().to_owned(),
            date,
            category_ids,
        })
    }
}
