//! Route handlers end to end over in-memory repositories

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_server::http::routes;
use catalog_server::models::Pagination;
use catalog_server::service::verify_password;
use catalog_server::CrudService;
use common::{MemoryCategoryRepo, RecordingUserRepo, StubProductRepo, DEPENDENT_ID};

type Categories = Arc<CrudService<MemoryCategoryRepo>>;

fn categories() -> Categories {
    Arc::new(CrudService::new(MemoryCategoryRepo::with_rows(&[
        "Books",
        "Electronics",
        "Computers",
    ])))
}

fn categories_app(service: &Categories) -> Router {
    routes::categories::router::<Categories, MemoryCategoryRepo>().with_state(service.clone())
}

async fn call(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, value)
}

// === Categories ===

#[tokio::test]
async fn list_categories_in_id_order() {
    let service = categories();

    let (status, _, body) = call(categories_app(&service), Method::GET, "/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Books", "Electronics", "Computers"]);
    assert_eq!(body[0]["id"], 1);
}

#[tokio::test]
async fn create_category_is_201_with_location() {
    let service = categories();

    let (status, headers, body) = call(
        categories_app(&service),
        Method::POST,
        "/categories",
        Some(json!({ "name": "Garden" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], "/categories/4");
    assert_eq!(body["id"], 4);
    assert_eq!(body["name"], "Garden");
}

#[tokio::test]
async fn delete_category_is_204_then_404() {
    let service = categories();

    let (status, _, _) = call(categories_app(&service), Method::DELETE, "/categories/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, body) = call(categories_app(&service), Method::GET, "/categories/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "category '2' not found");
}

#[tokio::test]
async fn delete_referenced_category_is_409() {
    let service = categories();
    service.repository().reference(1);

    let (status, _, body) = call(categories_app(&service), Method::DELETE, "/categories/1", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(service.count().await.unwrap(), 3);
}

#[tokio::test]
async fn update_missing_category_is_404() {
    let service = categories();

    let (status, _, body) = call(
        categories_app(&service),
        Method::PUT,
        "/categories/99",
        Some(json!({ "name": "Ghost" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(service.repository().snapshot().len(), 3);
}

#[tokio::test]
async fn paged_categories_wrapper() {
    let service = categories();

    let (status, _, body) = call(
        categories_app(&service),
        Method::GET,
        "/categories/paged?page=2&per_page=2",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 2);
    assert_eq!(body["items"][0]["name"], "Computers");
}

// === Products ===

fn products_app() -> (Router, Arc<common::Calls>) {
    let (repo, calls) = StubProductRepo::new();
    let app = routes::products::router::<Arc<CrudService<StubProductRepo>>, StubProductRepo>()
        .with_state(Arc::new(CrudService::new(repo)));
    (app, calls)
}

#[tokio::test]
async fn list_products_reads_one_page() {
    let (app, calls) = products_app();

    let (status, _, body) = call(app, Method::GET, "/products?page=1&per_page=10", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "Phone");
    assert_eq!(body["items"][0]["categories"][0]["name"], "Electronics");
    assert_eq!(calls.pages(), vec![Pagination::new(1, 10)]);
}

#[tokio::test]
async fn missing_product_is_404() {
    let (app, _) = products_app();

    let (status, _, body) = call(app, Method::GET, "/products/2", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn delete_referenced_product_is_409() {
    let (app, calls) = products_app();

    let uri = format!("/products/{DEPENDENT_ID}");
    let (status, _, body) = call(app, Method::DELETE, &uri, None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "integrity violation");
    assert_eq!(calls.deletes(), vec![DEPENDENT_ID]);
}

#[tokio::test]
async fn create_product_is_201_with_location() {
    let (app, _) = products_app();

    let (status, headers, body) = call(
        app,
        Method::POST,
        "/products",
        Some(json!({
            "name": "Phone",
            "description": "Good Phone",
            "price": 800.0,
            "date": "2020-07-13T20:50:07Z",
            "categories": [{ "id": 2 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], "/products/26");
    assert_eq!(body["id"], 26);
}

// === Users ===

#[tokio::test]
async fn create_user_never_returns_password() {
    let service = Arc::new(CrudService::new(RecordingUserRepo::default()));
    let app = routes::users::router::<Arc<CrudService<RecordingUserRepo>>, RecordingUserRepo>()
        .with_state(service.clone());

    let (status, headers, body) = call(
        app,
        Method::POST,
        "/users",
        Some(json!({
            "first_name": "Maria",
            "last_name": "Green",
            "email": "Maria@Gmail.com",
            "password": "123456",
            "roles": [{ "id": 1 }, { "id": 2 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], "/users/1");
    assert_eq!(body["email"], "maria@gmail.com");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let stored = service.repository().last_draft.lock().unwrap().clone().unwrap();
    assert_eq!(stored.role_ids, vec![1, 2]);
    assert!(verify_password("123456", stored.password_hash.as_deref().unwrap()));
}
