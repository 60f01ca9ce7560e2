use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Product, User};

/// Errors surfaced by any store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Persistence for product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products owned by `owner`, in storage order.
    async fn list_products(&self, owner: Uuid) -> Result<Vec<Product>, StoreError>;

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// Persist a new record and return it as stored.
    async fn insert_product(&self, product: Product) -> Result<Product, StoreError>;

    /// Overwrite the mutable fields (name, description, price) of an
    /// existing record. Returns `None` if the record vanished meanwhile.
    async fn save_product(&self, product: Product) -> Result<Option<Product>, StoreError>;

    /// Returns whether a record was removed.
    async fn delete_product(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Persistence for user credentials.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// A complete backend: both record kinds plus a liveness probe.
#[async_trait]
pub trait Datastore: ProductStore + UserStore {
    fn backend_name(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;
}
