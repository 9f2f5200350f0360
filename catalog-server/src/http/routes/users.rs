//! User endpoints - responses never carry the password

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::roles::RoleResponse;
use super::IdRef;
use crate::db::repos::Repository;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ValidId};
use crate::models::{Paginated, Pagination, PaginationParams, Password, User, UserDraft};
use crate::service::CrudService;

/// Create user request
#[derive(Deserialize)]
pub struct UserInsertRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<IdRef>,
}

/// Update user request; omit `password` to keep the current one
#[derive(Deserialize)]
pub struct UserUpdateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub roles: Vec<IdRef>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<RoleResponse>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            roles: u.roles.into_iter().map(RoleResponse::from).collect(),
        }
    }
}

type Service<R> = State<Arc<CrudService<R>>>;

/// GET /users - paginated
async fn list_users<R>(
    State(service): Service<R>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Paginated<UserResponse>>, ApiError>
where
    R: Repository<Entity = User, Draft = UserDraft>,
{
    let page = service.find_all_paged(Pagination::from(params)).await?;
    Ok(Json(page.map(UserResponse::from)))
}

/// GET /users/{id}
async fn get_user<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
) -> Result<Json<UserResponse>, ApiError>
where
    R: Repository<Entity = User, Draft = UserDraft>,
{
    Ok(Json(service.find_by_id(id).await?.into()))
}

/// POST /users
async fn create_user<R>(
    State(service): Service<R>,
    ApiJson(req): ApiJson<UserInsertRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    R: Repository<Entity = User, Draft = UserDraft>,
{
    let password = Password::new(&req.password)?;
    let draft = UserDraft::new(
        &req.first_name,
        &req.last_name,
        &req.email,
        req.roles.into_iter().map(|r| r.id),
    )?;

    let user = service.insert_with_password(draft, password).await?;
    let location = format!("/users/{}", user.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(user)),
    ))
}

/// PUT /users/{id}
async fn update_user<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<UserUpdateRequest>,
) -> Result<Json<UserResponse>, ApiError>
where
    R: Repository<Entity = User, Draft = UserDraft>,
{
    let password = req.password.as_deref().map(Password::new).transpose()?;
    let draft = UserDraft::new(
        &req.first_name,
        &req.last_name,
        &req.email,
        req.roles.into_iter().map(|r| r.id),
    )?;

    let user = service.update_with_password(id, draft, password).await?;
    Ok(Json(user.into()))
}

/// DELETE /users/{id}
async fn delete_user<R>(
    State(service): Service<R>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError>
where
    R: Repository<Entity = User, Draft = UserDraft>,
{
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router<S, R>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    R: Repository<Entity = User, Draft = UserDraft>,
    Arc<CrudService<R>>: FromRef<S>,
{
    Router::new()
        .route("/users", get(list_users::<R>).post(create_user::<R>))
        .route(
            "/users/{id}",
            get(get_user::<R>).put(update_user::<R>).delete(delete_user::<R>),
        )
}
