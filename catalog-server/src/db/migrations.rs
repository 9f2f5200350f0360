//! Schema migrations
//!
//! Every statement is idempotent, so running on each startup is safe.
//! Link tables cascade from their owning side (product, user) and restrict
//! from the referenced side (category, role).

use sqlx::PgPool;

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "categories",
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price DOUBLE PRECISION NOT NULL CHECK (price > 0),
            img_url TEXT NOT NULL DEFAULT '',
            date TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "product_categories",
        r#"
        CREATE TABLE IF NOT EXISTS product_categories (
            product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            category_id BIGINT NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
            PRIMARY KEY (product_id, category_id)
        )
        "#,
    ),
    (
        "roles",
        r#"
        CREATE TABLE IF NOT EXISTS roles (
            id BIGSERIAL PRIMARY KEY,
            authority VARCHAR(255) NOT NULL UNIQUE
        )
        "#,
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
        "#,
    ),
    (
        "user_roles",
        r#"
        CREATE TABLE IF NOT EXISTS user_roles (
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            role_id BIGINT NOT NULL REFERENCES roles(id) ON DELETE RESTRICT,
            PRIMARY KEY (user_id, role_id)
        )
        "#,
    ),
    (
        "idx_product_categories_category",
        "CREATE INDEX IF NOT EXISTS idx_product_categories_category ON product_categories(category_id)",
    ),
    (
        "idx_user_roles_role",
        "CREATE INDEX IF NOT EXISTS idx_user_roles_role ON user_roles(role_id)",
    ),
];

/// Run all catalog migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running catalog migrations...");

    for (name, sql) in MIGRATIONS {
        tracing::debug!(migration = name, "applying");
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!(count = MIGRATIONS.len(), "Catalog migrations complete");
    Ok(())
}
