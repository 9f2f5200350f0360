//! User use cases that need more than the generic CRUD: password hashing

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use super::{CrudService, ServiceError};
use crate::db::repos::Repository;
use crate::models::{Password, User, UserDraft};

/// Hash a plain password with argon2id.
pub fn hash_password(password: &Password) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|h| h.to_string())
}

/// Verify a password against an argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Hashing is CPU-bound; keep it off the async workers.
async fn hash_off_thread(password: Password) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))?
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
}

impl<R> CrudService<R>
where
    R: Repository<Entity = User, Draft = UserDraft>,
{
    /// Insert a user, storing only the hash of `password`.
    pub async fn insert_with_password(
        &self,
        draft: UserDraft,
        password: Password,
    ) -> Result<User, ServiceError> {
        let hash = hash_off_thread(password).await?;
        self.insert(draft.with_password_hash(hash)).await
    }

    /// Update a user; `None` keeps the stored password.
    pub async fn update_with_password(
        &self,
        id: i64,
        draft: UserDraft,
        password: Option<Password>,
    ) -> Result<User, ServiceError> {
        let draft = match password {
            Some(password) => draft.with_password_hash(hash_off_thread(password).await?),
            None => draft,
        };
        self.update(id, draft).await
    }
}
