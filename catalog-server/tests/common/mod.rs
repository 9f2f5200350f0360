//! Hand-written repositories for exercising services without a database.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_server::models::{
    Category, CategoryDraft, Pagination, Paginated, Product, ProductDraft, User, UserDraft,
};
use catalog_server::{DbError, Repository};

pub const EXISTING_ID: i64 = 1;
pub const NON_EXISTING_ID: i64 = 2;
pub const DEPENDENT_ID: i64 = 3;

pub fn fixed_date() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_594_673_407, 0).unwrap()
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_owned(),
        created_at: fixed_date(),
        updated_at: None,
    }
}

pub fn product() -> Product {
    Product {
        id: EXISTING_ID,
        name: "Phone".to_owned(),
        description: "Good Phone".to_owned(),
        price: 800.0,
        img_url: "https://img.catalog.local/products/phone.png".to_owned(),
        date: fixed_date(),
        categories: vec![category(2, "Electronics")],
    }
}

pub fn product_draft() -> ProductDraft {
    ProductDraft::new(
        "Phone",
        "Good Phone",
        800.0,
        "https://img.catalog.local/products/phone.png",
        fixed_date(),
        [2],
    )
    .unwrap()
}

/// Call log shared between a fake repository and the test body
#[derive(Default)]
pub struct Calls {
    pub find_all: AtomicUsize,
    pub find_page: Mutex<Vec<Pagination>>,
    pub find_by_id: Mutex<Vec<i64>>,
    pub insert: AtomicUsize,
    pub update: Mutex<Vec<i64>>,
    pub delete: Mutex<Vec<i64>>,
}

impl Calls {
    pub fn deletes(&self) -> Vec<i64> {
        self.delete.lock().unwrap().clone()
    }

    pub fn pages(&self) -> Vec<Pagination> {
        self.find_page.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<i64> {
        self.update.lock().unwrap().clone()
    }
}

/// Product repository with scripted outcomes:
/// - [`EXISTING_ID`] exists
/// - [`NON_EXISTING_ID`] does not
/// - [`DEPENDENT_ID`] exists but is still referenced
pub struct StubProductRepo {
    pub calls: Arc<Calls>,
}

impl StubProductRepo {
    pub fn new() -> (Self, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl Repository for StubProductRepo {
    type Entity = Product;
    type Draft = ProductDraft;

    const RESOURCE: &'static str = "product";

    async fn find_all(&self) -> Result<Vec<Product>, DbError> {
        self.calls.find_all.fetch_add(1, Ordering::SeqCst);
        Ok(vec![product()])
    }

    async fn find_page(&self, page: Pagination) -> Result<Paginated<Product>, DbError> {
        self.calls.find_page.lock().unwrap().push(page);
        Ok(Paginated::new(vec![product()], 1, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DbError> {
        self.calls.find_by_id.lock().unwrap().push(id);
        Ok((id == EXISTING_ID).then(product))
    }

    async fn insert(&self, draft: ProductDraft) -> Result<Product, DbError> {
        self.calls.insert.fetch_add(1, Ordering::SeqCst);
        Ok(Product {
            id: 26,
            name: draft.name.into_string(),
            ..product()
        })
    }

    async fn update(&self, id: i64, draft: ProductDraft) -> Result<Product, DbError> {
        self.calls.update.lock().unwrap().push(id);
        if id != EXISTING_ID {
            return Err(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            });
        }
        Ok(Product {
            id,
            name: draft.name.into_string(),
            description: draft.description,
            price: draft.price,
            img_url: draft.img_url,
            date: draft.date,
            categories: vec![],
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        self.calls.delete.lock().unwrap().push(id);
        match id {
            EXISTING_ID => Ok(()),
            DEPENDENT_ID => Err(DbError::IntegrityViolation(
                "update or delete on table \"products\" violates foreign key constraint".into(),
            )),
            _ => Err(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            }),
        }
    }

    async fn count(&self) -> Result<i64, DbError> {
        Ok(1)
    }
}

/// Category table kept in memory with auto-increment ids and a set of ids
/// that other rows reference
#[derive(Default)]
pub struct MemoryCategoryRepo {
    rows: Mutex<BTreeMap<i64, Category>>,
    referenced: Mutex<HashSet<i64>>,
}

impl MemoryCategoryRepo {
    /// Rows `1..=names.len()`, in order.
    pub fn with_rows(names: &[&str]) -> Self {
        let repo = Self::default();
        {
            let mut rows = repo.rows.lock().unwrap();
            for (i, name) in names.iter().enumerate() {
                let id = i as i64 + 1;
                rows.insert(id, category(id, name));
            }
        }
        repo
    }

    /// Mark `id` as referenced by another table.
    pub fn reference(&self, id: i64) {
        self.referenced.lock().unwrap().insert(id);
    }

    pub fn snapshot(&self) -> Vec<Category> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl Repository for MemoryCategoryRepo {
    type Entity = Category;
    type Draft = CategoryDraft;

    const RESOURCE: &'static str = "category";

    async fn find_all(&self) -> Result<Vec<Category>, DbError> {
        Ok(self.snapshot())
    }

    async fn find_page(&self, page: Pagination) -> Result<Paginated<Category>, DbError> {
        let rows = self.snapshot();
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Paginated::new(items, total, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DbError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, draft: CategoryDraft) -> Result<Category, DbError> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let row = category(id, draft.name.as_str());
        rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, draft: CategoryDraft) -> Result<Category, DbError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(&id).ok_or(DbError::EmptyResult {
            resource: Self::RESOURCE,
            id,
        })?;
        row.name = draft.name.into_string();
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        if self.referenced.lock().unwrap().contains(&id) {
            return Err(DbError::IntegrityViolation(format!(
                "category {id} is still referenced"
            )));
        }
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::EmptyResult {
                resource: Self::RESOURCE,
                id,
            })
    }

    async fn count(&self) -> Result<i64, DbError> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}

/// User repository that keeps the last draft it was handed
#[derive(Default)]
pub struct RecordingUserRepo {
    pub last_draft: Mutex<Option<UserDraft>>,
}

impl RecordingUserRepo {
    fn user_from(&self, id: i64, draft: &UserDraft) -> User {
        User {
            id,
            first_name: draft.first_name.as_str().to_owned(),
            last_name: draft.last_name.as_str().to_owned(),
            email: draft.email.as_str().to_owned(),
            password_hash: draft.password_hash.clone().unwrap_or_else(|| "kept".into()),
            roles: vec![],
        }
    }
}

#[async_trait]
impl Repository for RecordingUserRepo {
    type Entity = User;
    type Draft = UserDraft;

    const RESOURCE: &'static str = "user";

    async fn find_all(&self) -> Result<Vec<User>, DbError> {
        Ok(vec![])
    }

    async fn find_page(&self, page: Pagination) -> Result<Paginated<User>, DbError> {
        Ok(Paginated::new(vec![], 0, page))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<User>, DbError> {
        Ok(None)
    }

    async fn insert(&self, draft: UserDraft) -> Result<User, DbError> {
        let user = self.user_from(1, &draft);
        *self.last_draft.lock().unwrap() = Some(draft);
        Ok(user)
    }

    async fn update(&self, id: i64, draft: UserDraft) -> Result<User, DbError> {
        let user = self.user_from(id, &draft);
        *self.last_draft.lock().unwrap() = Some(draft);
        Ok(user)
    }

    async fn delete_by_id(&self, _id: i64) -> Result<(), DbError> {
        Ok(())
    }

    async fn count(&self) -> Result<i64, DbError> {
        Ok(0)
    }
}
