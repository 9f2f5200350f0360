//! Category endpoints

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::Repository;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ValidId};
use crate::models::{Category, CategoryDraft, Paginated, Pagination, PaginationParams};
use crate::service::CrudService;

/// Create/update category request
#[derive(Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

impl CategoryRequest {
    fn into_draft(self) -> Result<CategoryDraft, ApiError> {
        Ok(CategoryDraft::new(&self.name)?)
    }
}

/// Category response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

type Service<R> = State<Arc<CrudService<R>>>;

/// GET /categories - every category in id order
async fn list_categories<R>(
    State(service): Service<R>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError>
where
    R: Repository<Entity = Category, Draft = CategoryDraft>,
{
    let categories = service.find_all().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// GET /categories/paged - one page of categories
async fn page_categories<R>(
    State(service): Service<R>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Paginated<CategoryResponse>>, ApiError>
where
    R: Repository<Entity = Category, Draft = CategoryDraft>,
{
    let page = service.find_all_paged(Pagination::from(params)).await?;
    Ok(Json(page.map(CategoryResponse::from)))
}

/// GET /categories/{id}
async fn get_category<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
) -> Result<Json<CategoryResponse>, ApiError>
where
    R: Repository<Entity = Category, Draft = CategoryDraft>,
{
    let category = service.find_by_id(id).await?;
    Ok(Json(category.into()))
}

/// POST /categories
async fn create_category<R>(
    State(service): Service<R>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    R: Repository<Entity = Category, Draft = CategoryDraft>,
{
    let category = service.insert(req.into_draft()?).await?;
    let location = format!("/categories/{}", category.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CategoryResponse::from(category)),
    ))
}

/// PUT /categories/{id}
async fn update_category<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError>
where
    R: Repository<Entity = Category, Draft = CategoryDraft>,
{
    let category = service.update(id, req.into_draft()?).await?;
    Ok(Json(category.into()))
}

/// DELETE /categories/{id} - 409 while any product still links the category
async fn delete_category<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError>
where
    R: Repository<Entity = Category, Draft = CategoryDraft>,
{
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Category routes over any state that can hand out the category service
pub fn router<S, R>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    R: Repository<Entity = Category, Draft = CategoryDraft>,
    Arc<CrudService<R>>: FromRef<S>,
{
    Router::new()
        .route(
            "/categories",
            get(list_categories::<R>).post(create_category::<R>),
        )
        .route("/categories/paged", get(page_categories::<R>))
        .route(
            "/categories/{id}",
            get(get_category::<R>)
                .put(update_category::<R>)
                .delete(delete_category::<R>),
        )
}
