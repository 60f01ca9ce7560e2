use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::memory::MemoryStore;

/// In-memory application wiring for unit tests
pub struct TestContext {
    pub config: AppConfig,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        config.security.bcrypt_cost = 4;

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), &config).expect("development config has a signing secret");

        Self { config, store, state }
    }

    pub fn router(&self) -> Router {
        app(self.state.clone(), &self.config)
    }

    /// Sign up `email` and log in, returning the user id and bearer token
    pub async fn register(&self, email: &str) -> (Uuid, String) {
        let user = self
            .state
            .auth
            .signup(email, "test-password")
            .await
            .expect("signup should succeed");
        let token = self
            .state
            .auth
            .login(email, "test-password")
            .await
            .expect("login should succeed");
        (user.id, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_users_get_distinct_identities() {
        let ctx = TestContext::new();
        let (alice, alice_token) = ctx.register("alice@example.com").await;
        let (bob, bob_token) = ctx.register("bob@example.com").await;

        assert_ne!(alice, bob);
        assert_eq!(ctx.state.tokens.verify(&alice_token), Ok(alice));
        assert_eq!(ctx.state.tokens.verify(&bob_token), Ok(bob));
    }
}
