//! Fixture data for local development and the database-backed tests
//!
//! Loads 3 categories, 25 products, 2 roles and 2 users through the
//! repositories, so ids come out as 1..=n on a fresh schema.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use super::repos::{CategoryRepo, DbError, ProductRepo, Repository, RoleRepo, UserRepo};
use crate::models::{CategoryDraft, Password, ProductDraft, RoleDraft, UserDraft, ValidationError};
use crate::service::hash_password;

/// Number of products in the fixture
pub const SEED_PRODUCTS: usize = 25;

/// Plaintext password of every seeded user
pub const SEED_PASSWORD: &str = "123456";

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
                     sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

const CATEGORIES: &[&str] = &["Books", "Electronics", "Computers"];

/// (name, price, category ids)
const NAMED_PRODUCTS: &[(&str, f64, &[i64])] = &[
    ("The Lord of the Rings", 90.5, &[1]),
    ("Smart TV", 2190.0, &[2, 3]),
    ("Macbook Pro", 1250.0, &[3]),
    ("PC Gamer", 1200.0, &[3]),
    ("Rails for Dummies", 100.99, &[1]),
];

const GAMER_SUFFIXES: &[&str] = &[
    "Ex", "X", "Alfa", "Tera", "Y", "Nitro", "Card", "Plus", "Hera", "Weed", "Max", "Turbo",
    "Hot", "Ez", "Tr", "Tx", "Tu", "Foo", "Bar", "Boo",
];

const ROLES: &[&str] = &["ROLE_OPERATOR", "ROLE_ADMIN"];

/// (first name, last name, email, role ids)
const USERS: &[(&str, &str, &str, &[i64])] = &[
    ("Alex", "Brown", "alex@gmail.com", &[1]),
    ("Maria", "Green", "maria@gmail.com", &[1, 2]),
];

/// Seed failure
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("refusing to seed: table '{0}' already has rows (use --reset)")]
    NotEmpty(&'static str),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("invalid fixture: {0}")]
    Fixture(#[from] ValidationError),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Row counts written by [`run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
    pub roles: usize,
    pub users: usize,
}

/// Empty every catalog table and restart the id sequences.
pub async fn reset(pool: &PgPool) -> Result<(), DbError> {
    tracing::warn!("Truncating catalog tables");
    sqlx::query(
        r#"
        TRUNCATE product_categories, user_roles, products, categories, users, roles
        RESTART IDENTITY CASCADE
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// The fixture's product drafts, in insertion order.
pub fn product_drafts() -> Result<Vec<ProductDraft>, ValidationError> {
    let base = DateTime::<Utc>::from_timestamp(1_594_673_407, 0).unwrap_or_default();

    let named = NAMED_PRODUCTS
        .iter()
        .map(|(name, price, ids)| (name.to_string(), *price, ids.to_vec()));
    let gamers = GAMER_SUFFIXES
        .iter()
        .enumerate()
        .map(|(i, suffix)| (format!("PC Gamer {suffix}"), 1350.0 + 50.0 * i as f64, vec![3]));

    named
        .chain(gamers)
        .enumerate()
        .map(|(i, (name, price, ids))| {
            ProductDraft::new(
                &name,
                LOREM,
                price,
                format!("https://img.catalog.local/products/{}-big.jpg", i + 1),
                base + Duration::hours(i as i64),
                ids,
            )
        })
        .collect()
}

/// Load the fixture. Refuses a non-empty catalog unless `reset_first`.
pub async fn run(pool: &PgPool, reset_first: bool) -> Result<SeedReport, SeedError> {
    if reset_first {
        reset(pool).await?;
    }

    let categories = CategoryRepo::new(pool.clone());
    if categories.count().await? > 0 {
        return Err(SeedError::NotEmpty("categories"));
    }

    let mut report = SeedReport::default();

    for name in CATEGORIES {
        categories.insert(CategoryDraft::new(name)?).await?;
        report.categories += 1;
    }

    let products = ProductRepo::new(pool.clone());
    for draft in product_drafts()? {
        products.insert(draft).await?;
        report.products += 1;
    }

    let roles = RoleRepo::new(pool.clone());
    for authority in ROLES {
        roles.insert(RoleDraft::new(authority)?).await?;
        report.roles += 1;
    }

    let users = UserRepo::new(pool.clone());
    let password = Password::new(SEED_PASSWORD)?;
    for (first, last, email, role_ids) in USERS {
        let hash = hash_password(&password).map_err(|e| SeedError::Hash(e.to_string()))?;
        let draft = UserDraft::new(first, last, email, role_ids.iter().copied())?
            .with_password_hash(hash);
        users.insert(draft).await?;
        report.users += 1;
    }

    tracing::info!(
        categories = report.categories,
        products = report.products,
        roles = report.roles,
        users = report.users,
        "Seed complete"
    );
    Ok(report)
}
