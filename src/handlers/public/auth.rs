// handlers/public/auth.rs - token acquisition, no authentication required

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::models::User;
use crate::error::ApiError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /auth/signup - create a user account
///
/// Expected Input:
/// ```json
/// { "email": "ada@example.com", "password": "at least eight chars" }
/// ```
///
/// Returns 201 with `{ "id", "email", "createdAt" }`; 409 if the email is taken.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(body) = payload?;
    let user = state.auth.signup(&body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login - exchange credentials for a bearer token
///
/// Returns `{ "token": "eyJhbGciOiJIUzI1NiI..." }`; 401 on bad credentials.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(body) = payload?;
    let token = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(TokenResponse { token }))
}
