use std::sync::Arc;

use crate::auth::credentials::{
    hash_password, normalize_email, validate_email_format, validate_password, verify_password,
};
use crate::auth::{TokenError, TokenService};
use crate::database::models::User;
use crate::database::store::{StoreError, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("Password hashing task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Store(other),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub bcrypt_cost: u32,
    pub min_length: usize,
}

/// Signup and login over the credential store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>, policy: PasswordPolicy) -> Self {
        Self { users, tokens, policy }
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        validate_email_format(&email).map_err(|message| AuthError::Validation { field: "email", message })?;
        validate_password(password, self.policy.min_length)
            .map_err(|message| AuthError::Validation { field: "password", message })?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password = password.to_string();
        let cost = self.policy.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;
        let user = self.users.insert_user(User::new(email, password_hash)).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Returns a bearer token. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation {
                field: if email.is_empty() { "email" } else { "password" },
                message: "Email and password are required".to_string(),
            });
        }

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            tracing::debug!("login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await?;
        if !matches {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.tokens.issue(user.id)?)
    }
}
