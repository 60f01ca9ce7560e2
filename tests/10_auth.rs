mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_reports_store() -> Result<()> {
    let server = common::start_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::start_server().await?;

    let body: Value = server.client.get(server.url("/")).send().await?.json().await?;
    assert_eq!(body["data"]["name"], "Shelf API");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn signup_returns_public_user_fields() -> Result<()> {
    let server = common::start_server().await?;

    let res = server
        .client
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": "Ada@Example.com", "password": common::PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    assert_eq!(body["email"], "ada@example.com");
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_signup_conflicts() -> Result<()> {
    let server = common::start_server().await?;
    server.register("ada@example.com").await?;

    let res = server
        .client
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": "ada@example.com", "password": "another-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn signup_rejects_short_password() -> Result<()> {
    let server = common::start_server().await?;

    let res = server
        .client
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": "ada@example.com", "password": "short" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_issues_token() -> Result<()> {
    let server = common::start_server().await?;
    let token = server.register("ada@example.com").await?;
    assert_eq!(token.split('.').count(), 3);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() -> Result<()> {
    let server = common::start_server().await?;
    server.register("ada@example.com").await?;

    let wrong_password = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": "ada@example.com", "password": "not-the-password" }))
        .send()
        .await?;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = wrong_password.json().await?;

    let unknown_email = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": "nobody@example.com", "password": common::PASSWORD }))
        .send()
        .await?;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email: Value = unknown_email.json().await?;

    assert_eq!(wrong_password, unknown_email);
    Ok(())
}

#[tokio::test]
async fn malformed_login_body_is_bad_request() -> Result<()> {
    let server = common::start_server().await?;

    let res = server
        .client
        .post(server.url("/auth/login"))
        .header("content-type", "application/json")
        .body("{\"email\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
