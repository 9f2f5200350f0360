//! Category service over an in-memory table: store-visible effects of each
//! operation

mod common;

use catalog_server::models::{CategoryDraft, Pagination};
use catalog_server::{CrudService, Repository, ServiceError};
use common::MemoryCategoryRepo;

fn service() -> CrudService<MemoryCategoryRepo> {
    CrudService::new(MemoryCategoryRepo::with_rows(&[
        "Books",
        "Electronics",
        "Computers",
    ]))
}

#[tokio::test]
async fn find_all_returns_rows_in_id_order() {
    let service = service();

    let names: Vec<String> = service
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(names, vec!["Books", "Electronics", "Computers"]);
}

#[tokio::test]
async fn insert_assigns_max_id_plus_one() {
    let service = service();

    let created = service
        .insert(CategoryDraft::new("Garden").unwrap())
        .await
        .unwrap();

    assert_eq!(created.id, 4);
    assert_eq!(service.count().await.unwrap(), 4);
}

#[tokio::test]
async fn delete_removes_existing_row() {
    let service = service();

    service.delete(2).await.unwrap();

    let err = service.find_by_id(2).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { resource: "category", .. }));
    assert!(service.repository().find_by_id(2).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_row_is_not_found() {
    let service = service();

    let err = service.delete(1000).await.unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { ref id, .. } if id == "1000"));
    assert_eq!(service.count().await.unwrap(), 3);
}

#[tokio::test]
async fn delete_referenced_row_is_conflict_and_keeps_count() {
    let service = service();
    service.repository().reference(1);

    let err = service.delete(1).await.unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(service.count().await.unwrap(), 3);
    assert!(service.find_by_id(1).await.is_ok());
}

#[tokio::test]
async fn update_existing_row_overwrites_name() {
    let service = service();

    let updated = service
        .update(3, CategoryDraft::new("Laptops").unwrap())
        .await
        .unwrap();

    assert_eq!(updated.id, 3);
    assert_eq!(updated.name, "Laptops");
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn update_missing_row_leaves_store_untouched() {
    let service = service();
    let before = service.repository().snapshot();

    let err = service
        .update(99, CategoryDraft::new("Ghost").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { .. }));
    assert_eq!(service.repository().snapshot(), before);
}

#[tokio::test]
async fn paged_read_reports_total() {
    let service = service();

    let page = service.find_all_paged(Pagination::new(2, 2)).await.unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Computers");
    assert!(!page.has_next());
}
