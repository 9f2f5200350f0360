//! Role endpoints

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
use crate::http::extractors::{ApiJson, ValidId};
use crate::models::{Role, RoleDraft};
use crate::service::CrudService;

#[derive(Deserialize)]
pub struct RoleRequest {
    pub authority: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleResponse {
    pub id: i64,
    pub authority: String,
}

impl From<Role> for RoleResponse {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            authority: r.authority,
        }
    }
}

type Service<R> = State<Arc<CrudService<R>>>;

/// GET /roles
async fn list_roles<R>(State(service): Service<R>) -> Result<Json<Vec<RoleResponse>>, ApiError>
where
    R: Repository<Entity = Role, Draft = RoleDraft>,
{
    let roles = service.find_all().await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

/// GET /roles/{id}
async fn get_role<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
) -> Result<Json<RoleResponse>, ApiError>
where
    R: Repository<Entity = Role, Draft = RoleDraft>,
{
    Ok(Json(service.find_by_id(id).await?.into()))
}

/// POST /roles
async fn create_role<R>(
    State(service): Service<R>,
    ApiJson(req): ApiJson<RoleRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    R: Repository<Entity = Role, Draft = RoleDraft>,
{
    let role = service.insert(RoleDraft::new(&req.authority)?).await?;
    let location = format!("/roles/{}", role.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RoleResponse::from(role)),
    ))
}

/// PUT /roles/{id}
async fn update_role<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<RoleRequest>,
) -> Result<Json<RoleResponse>, ApiError>
where
    R: Repository<Entity = Role, Draft = RoleDraft>,
{
    let role = service.update(id, RoleDraft::new(&req.authority)?).await?;
    Ok(Json(role.into()))
}

/// DELETE /roles/{id} - 409 while any user still holds the role
async fn delete_role<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError>
where
    R: Repository<Entity = Role, Draft = RoleDraft>,
{
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router<S, R>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    R: Repository<Entity = Role, Draft = RoleDraft>,
    Arc<CrudService<R>>: FromRef<S>,
{
    Router::new()
        .route("/roles", get(list_roles::<R>).post(create_role::<R>))
        .route(
            "/roles/{id}",
            get(get_role::<R>).put(update_role::<R>).delete(delete_role::<R>),
        )
}
