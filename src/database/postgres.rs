use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Product, User};
use crate::database::store::{Datastore, ProductStore, StoreError, UserStore};

const PRODUCT_COLUMNS: &str = "id, user_id, name, description, price, created_at";
const USER_COLUMNS: &str = "id, email, password_hash, created_at";

/// PostgreSQL-backed store. Tables are created by the migrations in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unique_violation(err: sqlx::Error, what: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(what),
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self, owner: Uuid) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {} FROM products WHERE user_id = $1 ORDER BY created_at, id",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Product>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_product(&self, product: Product) -> Result<Product, StoreError> {
        let sql = format!(
            "INSERT INTO products ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            cols = PRODUCT_COLUMNS
        );
        let id = product.id;
        sqlx::query_as::<_, Product>(&sql)
            .bind(product.id)
            .bind(product.owner)
            .bind(product.name)
            .bind(product.description)
            .bind(product.price)
            .bind(product.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, format!("product {} already exists", id)))
    }

    async fn save_product(&self, product: Product) -> Result<Option<Product>, StoreError> {
        let sql = format!(
            "UPDATE products SET name = $2, description = $3, price = $4 WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(product.id)
            .bind(product.name)
            .bind(product.description)
            .bind(product.price)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users ({cols}) VALUES ($1, $2, $3, $4) RETURNING {cols}",
            cols = USER_COLUMNS
        );
        let email = user.email.clone();
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(user.email)
            .bind(user.password_hash)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, format!("email {} already registered", email)))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl Datastore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    /// Pings the pool to ensure connectivity
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
