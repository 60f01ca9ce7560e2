use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{NewProduct, Product, ProductPatch};
use crate::database::store::{ProductStore, StoreError};
use crate::types::Field;

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },
    #[error("Product not found")]
    NotFound,
    #[error("Not authorized")]
    Forbidden,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ProductError {
    fn validation(message: &str, field_errors: HashMap<String, String>) -> Self {
        ProductError::Validation {
            message: message.to_string(),
            field_errors,
        }
    }
}

/// Ownership-enforcing operations over a [`ProductStore`].
///
/// Every call takes the caller's user id as resolved by the auth gate.
/// Lookups by id check existence first and ownership second, so a missing
/// record is always `NotFound` and someone else's record is always
/// `Forbidden`.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller: Uuid) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.list_products(caller).await?)
    }

    pub async fn create(&self, caller: Uuid, input: NewProduct) -> Result<Product, ProductError> {
        let mut field_errors = HashMap::new();
        let name = input.name.filter(|n| !n.is_empty());
        if name.is_none() {
            field_errors.insert("name".to_string(), "This field is required".to_string());
        }
        if input.price.is_none() {
            field_errors.insert("price".to_string(), "This field is required".to_string());
        }

        let (Some(name), Some(price)) = (name, input.price) else {
            return Err(ProductError::validation("Name and price are required", field_errors));
        };

        let product = Product {
            id: Uuid::new_v4(),
            owner: caller,
            name,
            description: input.description,
            price: price.value(),
            created_at: Utc::now(),
        };

        let product = self.store.insert_product(product).await?;
        tracing::info!(product_id = %product.id, owner = %caller, "product created");
        Ok(product)
    }

    pub async fn update(&self, caller: Uuid, id: Uuid, patch: ProductPatch) -> Result<Product, ProductError> {
        Self::validate_patch(&patch)?;

        let mut product = self.load_owned(caller, id).await?;

        if let Field::Value(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description.into_patch() {
            product.description = description;
        }
        if let Field::Value(price) = patch.price {
            product.price = price.value();
        }

        // A concurrent delete between load and save surfaces as not found
        let saved = self.store.save_product(product).await?.ok_or(ProductError::NotFound)?;
        tracing::debug!(product_id = %id, owner = %caller, "product updated");
        Ok(saved)
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), ProductError> {
        self.load_owned(caller, id).await?;

        if !self.store.delete_product(id).await? {
            return Err(ProductError::NotFound);
        }
        tracing::info!(product_id = %id, owner = %caller, "product removed");
        Ok(())
    }

    async fn load_owned(&self, caller: Uuid, id: Uuid) -> Result<Product, ProductError> {
        let product = self.store.find_product(id).await?.ok_or(ProductError::NotFound)?;
        if !product.is_owned_by(caller) {
            return Err(ProductError::Forbidden);
        }
        Ok(product)
    }

    /// Required fields may be replaced but never cleared.
    fn validate_patch(patch: &ProductPatch) -> Result<(), ProductError> {
        let mut field_errors = HashMap::new();

        match patch.name.as_ref() {
            Field::Null => {
                field_errors.insert("name".to_string(), "Name cannot be removed".to_string());
            }
            Field::Value(name) if name.is_empty() => {
                field_errors.insert("name".to_string(), "Name cannot be empty".to_string());
            }
            _ => {}
        }
        if matches!(patch.price, Field::Null) {
            field_errors.insert("price".to_string(), "Price cannot be removed".to_string());
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ProductError::validation("Invalid product update", field_errors))
        }
    }
}
