//! HTTP client for the product API and the session state built on it.

pub mod session;

pub use session::Session;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{NewProduct, Product, ProductPatch, User};
use crate::handlers::public::auth::{CredentialsRequest, TokenResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    /// No token held, or the server rejected the one presented
    #[error("not logged in")]
    Unauthenticated,

    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthenticated => Some(StatusCode::UNAUTHORIZED),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// Stateless wrapper over the REST surface. Tokens are passed per call.
#[derive(Debug, Clone)]
pub struct ProductClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let res = self.request(Method::GET, "/health", None).send().await?;
        // 503 still carries a JSON status document
        Ok(res.json().await?)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let body = CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let res = self.request(Method::POST, "/auth/signup", None).json(&body).send().await?;
        decode(res).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let body = CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let res = self.request(Method::POST, "/auth/login", None).json(&body).send().await?;
        let TokenResponse { token } = decode(res).await?;
        Ok(token)
    }

    pub async fn list_products(&self, token: &str) -> Result<Vec<Product>, ClientError> {
        let res = self.request(Method::GET, "/products/", Some(token)).send().await?;
        decode_authed(res).await
    }

    pub async fn create_product(&self, token: &str, product: &NewProduct) -> Result<Product, ClientError> {
        let res = self
            .request(Method::POST, "/products", Some(token))
            .json(product)
            .send()
            .await?;
        decode_authed(res).await
    }

    pub async fn update_product(&self, token: &str, id: Uuid, patch: &ProductPatch) -> Result<Product, ClientError> {
        let res = self
            .request(Method::PUT, &format!("/products/{}", id), Some(token))
            .json(patch)
            .send()
            .await?;
        decode_authed(res).await
    }

    /// Returns the server's confirmation message
    pub async fn delete_product(&self, token: &str, id: Uuid) -> Result<String, ClientError> {
        let res = self
            .request(Method::DELETE, &format!("/products/{}", id), Some(token))
            .send()
            .await?;
        let MessageBody { message } = decode_authed(res).await?;
        Ok(message)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Decode a response to a call made with a bearer token; 401 means the
/// token is no longer usable.
async fn decode_authed<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    if res.status() == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthenticated);
    }
    decode(res).await
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let message = res
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    Err(ClientError::Api { status, message })
}
