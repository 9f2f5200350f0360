//! Product endpoints

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::categories::CategoryResponse;
use super::IdRef;
use crate::db::repos::Repository;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ValidId};
use crate::models::{Paginated, Pagination, PaginationParams, Product, ProductDraft};
use crate::service::CrudService;

/// Create/update product request
///
/// `categories` replaces the product's whole category set.
#[derive(Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub img_url: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<IdRef>,
}

impl ProductRequest {
    fn into_draft(self) -> Result<ProductDraft, ApiError> {
        Ok(ProductDraft::new(
            &self.name,
            self.description,
            self.price,
            self.img_url,
            self.date,
            self.categories.into_iter().map(|c| c.id),
        )?)
    }
}

/// Product response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    pub date: String,
    pub categories: Vec<CategoryResponse>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            img_url: p.img_url,
            date: p.date.to_rfc3339(),
            categories: p.categories.into_iter().map(CategoryResponse::from).collect(),
        }
    }
}

type Service<R> = State<Arc<CrudService<R>>>;

/// GET /products - paginated
async fn list_products<R>(
    State(service): Service<R>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Paginated<ProductResponse>>, ApiError>
where
    R: Repository<Entity = Product, Draft = ProductDraft>,
{
    let page = service.find_all_paged(Pagination::from(params)).await?;
    Ok(Json(page.map(ProductResponse::from)))
}

/// GET /products/{id}
async fn get_product<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
) -> Result<Json<ProductResponse>, ApiError>
where
    R: Repository<Entity = Product, Draft = ProductDraft>,
{
    let product = service.find_by_id(id).await?;
    Ok(Json(product.into()))
}

/// POST /products
async fn create_product<R>(
    State(service): Service<R>,
    ApiJson(req): ApiJson<ProductRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    R: Repository<Entity = Product, Draft = ProductDraft>,
{
    let product = service.insert(req.into_draft()?).await?;
    let location = format!("/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse::from(product)),
    ))
}

/// PUT /products/{id}
async fn update_product<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError>
where
    R: Repository<Entity = Product, Draft = ProductDraft>,
{
    let product = service.update(id, req.into_draft()?).await?;
    Ok(Json(product.into()))
}

/// DELETE /products/{id}
async fn delete_product<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError>
where
    R: Repository<Entity = Product, Draft = ProductDraft>,
{
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Product routes
pub fn router<S, R>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    R: Repository<Entity = Product, Draft = ProductDraft>,
    Arc<CrudService<R>>: FromRef<S>,
{
    Router::new()
        .route("/products", get(list_products::<R>).post(create_product::<R>))
        .route(
            "/products/{id}",
            get(get_product::<R>)
                .put(update_product::<R>)
                .delete(delete_product::<R>),
        )
}
