use uuid::Uuid;

use super::{ClientError, ProductClient};
use crate::database::models::{NewProduct, Product, ProductPatch};

/// Client-held login state plus a local copy of the caller's products.
///
/// The cache is filled by [`Session::load`] and patched in place after each
/// successful mutation, so the list is never re-fetched just to reflect a
/// create, update or delete.
#[derive(Debug, Clone)]
pub struct Session {
    client: ProductClient,
    token: Option<String>,
    products: Vec<Product>,
}

impl Session {
    pub fn new(client: ProductClient) -> Self {
        Self {
            client,
            token: None,
            products: Vec::new(),
        }
    }

    /// Resume with a token persisted from an earlier login
    pub fn with_token(client: ProductClient, token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            ..Self::new(client)
        }
    }

    pub fn client(&self) -> &ProductClient {
        &self.client
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let token = self.client.login(email, password).await?;
        self.token = Some(token);
        self.products.clear();
        Ok(())
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.products.clear();
    }

    /// Replace the cache with the server's current list
    pub async fn load(&mut self) -> Result<&[Product], ClientError> {
        let token = self.require_token()?;
        let result = self.client.list_products(&token).await;
        self.products = self.check(result)?;
        Ok(&self.products)
    }

    pub async fn create(&mut self, product: &NewProduct) -> Result<Product, ClientError> {
        let token = self.require_token()?;
        let result = self.client.create_product(&token, product).await;
        let created = self.check(result)?;
        self.products.push(created.clone());
        Ok(created)
    }

    pub async fn update(&mut self, id: Uuid, patch: &ProductPatch) -> Result<Product, ClientError> {
        let token = self.require_token()?;
        let result = self.client.update_product(&token, id, patch).await;
        let updated = self.check(result)?;
        match self.products.iter_mut().find(|p| p.id == updated.id) {
            Some(cached) => *cached = updated.clone(),
            None => self.products.push(updated.clone()),
        }
        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<String, ClientError> {
        let token = self.require_token()?;
        let result = self.client.delete_product(&token, id).await;
        let message = self.check(result)?;
        self.products.retain(|p| p.id != id);
        Ok(message)
    }

    fn require_token(&self) -> Result<String, ClientError> {
        self.token.clone().ok_or(ClientError::Unauthenticated)
    }

    /// A rejected token is dropped so the caller has to log in again
    fn check<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if matches!(result, Err(ClientError::Unauthenticated)) {
            self.logout();
        }
        result
    }
}
