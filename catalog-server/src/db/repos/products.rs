//! Product repository
//!
//! Products carry their categories through `product_categories`:
//! - reads attach categories with one query per batch of products
//! - insert/update write the product row and its links atomically
//! - links are replaced wholesale on update

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use super::{begin_read_only, first_missing_id, DbError, Repository};
use crate::models::{Category, Pagination, Paginated, Product, ProductDraft};

/// Product row without its categories
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    img_url: String,
    date: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ProductCategoryRow {
    product_id: i64,
    #[sqlx(flatten)]
    category: Category,
}

/// Product repository
#[derive(Clone)]
pub struct ProductRepo {
    pool: PgPool,
}

impl ProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Load categories for every row in one query and assemble products.
async fn attach_categories(
    conn: &mut PgConnection,
    rows: Vec<ProductRow>,
) -> Result<Vec<Product>, DbError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let links: Vec<ProductCategoryRow> = sqlx::query_as(
        r#"
        SELECT pc.product_id, c.id, c.name, c.created_at, c.updated_at
        FROM product_categories pc
        JOIN categories c ON c.id = pc.category_id
        WHERE pc.product_id = ANY($1)
        ORDER BY pc.product_id, c.id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_product: HashMap<i64, Vec<Category>> = HashMap::new();
    for link in links {
        by_product.entry(link.product_id).or_default().push(link.category);
    }

    Ok(rows
        .into_iter()
        .map(|r| Product {
            categories: by_product.remove(&r.id).unwrap_or_default(),
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            img_url: r.img_url,
            date: r.date,
        })
        .collect())
}

async fn fetch_one(conn: &mut PgConnection, id: i64) -> Result<Option<Product>, DbError> {
    let row: Option<ProductRow> = sqlx::query_as(
        "SELECT id, name, description, price, img_url, date FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(attach_categories(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Replace the product's category links.
async fn write_links(
    conn: &mut PgConnection,
    product_id: i64,
    category_ids: &[i64],
) -> Result<(), DbError> {
    sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    if !category_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO product_categories (product_id, category_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(product_id)
        .bind(category_ids)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl Repository for ProductRepo {
    type Entity = Product;
    type Draft = ProductDraft;

    const RESOURCE: &'static str = "product";

    async fn find_all(&self) -> Result<Vec<Product>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, price, img_url, date FROM products ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;
        let products = attach_categories(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(products)
    }

    async fn find_page(&self, page: Pagination) -> Result<Paginated<Product>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price, img_url, date
            FROM products
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *tx)
        .await?;

        let items = attach_categories(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(Paginated::new(items, total, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DbError> {
        let mut tx = begin_read_only(&self.pool).await?;
        let product = fetch_one(&mut tx, id).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, DbError> {
        let mut tx = self.pool.begin().await?;

        if let Some(missing) = first_missing_id(&mut tx, "categories", &draft.category_ids).await? {
            return Err(DbError::NotFound {
                resource: "category",
                id: missing.to_string(),
            });
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, description, price, img_url, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(draft.name.as_str())
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.img_url)
        .bind(draft.date)
        .fetch_one(&mut *tx)
        .await?;

        write_links(&mut tx, id, &draft.category_ids).await?;

        let product = fetch_one(&mut tx, id)
            .await?
            .ok_or(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            })?;

        tx.commit().await?;
        Ok(product)
    }

    async fn update(&self, id: i64, draft: ProductDraft) -> Result<Product, DbError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET name = $1, description = $2, price = $3, img_url = $4, date = $5
            WHERE id = $6
            RETURNING id
            "#,
        )
        .bind(draft.name.as_str())
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.img_url)
        .bind(draft.date)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            });
        }

        if let Some(missing) = first_missing_id(&mut tx, "categories", &draft.category_ids).await? {
            return Err(DbError::NotFound {
                resource: "category",
                id: missing.to_string(),
            });
        }

        write_links(&mut tx, id, &draft.category_ids).await?;

        let product = fetch_one(&mut tx, id)
            .await?
            .ok_or(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            })?;

        tx.commit().await?;
        Ok(product)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            });
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, DbError> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
