use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Product, User};
use crate::database::store::{Datastore, ProductStore, StoreError, UserStore};

/// Process-local store used for development and tests.
///
/// Records live in insertion order, which is the order `list_products`
/// reports them in.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self, owner: Uuid) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| p.is_owned_by(owner)).cloned().collect())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: Product) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return Err(StoreError::Conflict(format!("product {} already exists", product.id)));
        }
        products.push(product.clone());
        Ok(product)
    }

    async fn save_product(&self, product: Product) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        let Some(stored) = products.iter_mut().find(|p| p.id == product.id) else {
            return Ok(None);
        };
        stored.name = product.name;
        stored.description = product.description;
        stored.price = product.price;
        Ok(Some(stored.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {} already registered", user.email)));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
