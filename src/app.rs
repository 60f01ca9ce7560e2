use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::store::Datastore;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::services::{AuthService, PasswordPolicy, ProductService};

/// Shared, cheaply cloneable request state
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub auth: AuthService,
    pub tokens: Arc<TokenService>,
    pub store: Arc<dyn Datastore>,
}

impl AppState {
    /// Wire services over `store` using the security settings in `config`
    pub fn new<S>(store: Arc<S>, config: &AppConfig) -> Result<Self, TokenError>
    where
        S: Datastore + 'static,
    {
        let tokens = Arc::new(TokenService::from_hours(
            &config.security.jwt_secret,
            config.security.jwt_expiry_hours,
        )?);
        let policy = PasswordPolicy {
            bcrypt_cost: config.security.bcrypt_cost,
            min_length: config.security.min_password_length,
        };

        Ok(Self {
            products: ProductService::new(store.clone()),
            auth: AuthService::new(store.clone(), tokens.clone(), policy),
            tokens,
            store,
        })
    }
}

/// Build the full router: public routes, token-gated product routes and global layers
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        // Protected
        .merge(product_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn auth_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
}

fn product_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::products;

    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/", get(products::list).post(products::create))
        .route("/products/:id", put(products::update).delete(products::delete))
        // route_layer so unmatched paths still 404 instead of 401
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
