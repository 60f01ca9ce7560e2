mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use shelf_api::auth::TokenService;
use shelf_api::config::AppConfig;

#[tokio::test]
async fn ownership_scenario() -> Result<()> {
    let server = common::start_server().await?;
    let alice = server.register("alice@example.com").await?;
    let bob = server.register("bob@example.com").await?;

    let pen = server.create_product(&alice, json!({ "name": "Pen", "price": 10 })).await?;
    let id = pen["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(pen["name"], "Pen");
    assert_eq!(pen["price"], 10.0);

    let res = server
        .client
        .put(server.url(&format!("/products/{}", id)))
        .bearer_auth(&bob)
        .json(&json!({ "price": 5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .put(server.url(&format!("/products/{}", id)))
        .bearer_auth(&alice)
        .json(&json!({ "price": 5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["price"], 5.0);
    assert_eq!(updated["name"], "Pen");

    let res = server
        .client
        .delete(server.url(&format!("/products/{}", id)))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Product removed");

    let list: Vec<Value> = server
        .client
        .get(server.url("/products/"))
        .bearer_auth(&alice)
        .send()
        .await?
        .json()
        .await?;
    assert!(list.iter().all(|p| p["id"] != id.as_str()));
    Ok(())
}

#[tokio::test]
async fn list_only_returns_callers_products() -> Result<()> {
    let server = common::start_server().await?;
    let alice = server.register("alice@example.com").await?;
    let bob = server.register("bob@example.com").await?;

    server.create_product(&alice, json!({ "name": "Pen", "price": 10 })).await?;
    server.create_product(&alice, json!({ "name": "Ink", "price": "2.50" })).await?;
    server.create_product(&bob, json!({ "name": "Lamp", "price": 40 })).await?;

    for path in ["/products", "/products/"] {
        let list: Vec<Value> = server
            .client
            .get(server.url(path))
            .bearer_auth(&alice)
            .send()
            .await?
            .json()
            .await?;
        let mut names: Vec<&str> = list.iter().filter_map(|p| p["name"].as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["Ink", "Pen"]);
    }
    Ok(())
}

#[tokio::test]
async fn create_echoes_fields_and_assigns_owner() -> Result<()> {
    let server = common::start_server().await?;
    let token = server.register("alice@example.com").await?;

    // The owner is reported under "user" and must match the token subject
    let user_id = TokenService::from_hours(&AppConfig::development().security.jwt_secret, 1)?.verify(&token)?;

    let product = server
        .create_product(&token, json!({ "name": "Pen", "description": "blue ink", "price": 10 }))
        .await?;
    assert_eq!(product["user"], user_id.to_string());
    assert_eq!(product["description"], "blue ink");
    assert!(Uuid::parse_str(product["id"].as_str().unwrap_or_default()).is_ok());
    assert!(product["createdAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn create_requires_name_and_price() -> Result<()> {
    let server = common::start_server().await?;
    let token = server.register("alice@example.com").await?;

    for body in [json!({ "price": 10 }), json!({ "name": "Pen" }), json!({ "name": "", "price": 1 })] {
        let res = server
            .client
            .post(server.url("/products/"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {}", body);
        let error: Value = res.json().await?;
        assert_eq!(error["code"], "VALIDATION_ERROR");
    }

    let list: Vec<Value> = server
        .client
        .get(server.url("/products/"))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_changes_only_supplied_fields() -> Result<()> {
    let server = common::start_server().await?;
    let token = server.register("alice@example.com").await?;
    let pen = server
        .create_product(&token, json!({ "name": "Pen", "description": "blue ink", "price": 10 }))
        .await?;
    let id = pen["id"].as_str().unwrap_or_default();

    let res = server
        .client
        .put(server.url(&format!("/products/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "price": 7.5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["name"], "Pen");
    assert_eq!(updated["description"], "blue ink");
    assert_eq!(updated["price"], 7.5);
    assert_eq!(updated["createdAt"], pen["createdAt"]);

    let res = server
        .client
        .put(server.url(&format!("/products/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "name": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn missing_product_is_not_found_not_forbidden() -> Result<()> {
    let server = common::start_server().await?;
    let token = server.register("alice@example.com").await?;

    for path in [format!("/products/{}", Uuid::new_v4()), "/products/not-an-id".to_string()] {
        let res = server
            .client
            .put(server.url(&path))
            .bearer_auth(&token)
            .json(&json!({ "price": 1 }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "PUT {}", path);

        let res = server.client.delete(server.url(&path)).bearer_auth(&token).send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "DELETE {}", path);
    }
    Ok(())
}

#[tokio::test]
async fn non_owner_delete_is_forbidden_and_keeps_record() -> Result<()> {
    let server = common::start_server().await?;
    let alice = server.register("alice@example.com").await?;
    let bob = server.register("bob@example.com").await?;
    let pen = server.create_product(&alice, json!({ "name": "Pen", "price": 10 })).await?;
    let id = pen["id"].as_str().unwrap_or_default();

    let res = server
        .client
        .delete(server.url(&format!("/products/{}", id)))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let list: Vec<Value> = server
        .client
        .get(server.url("/products/"))
        .bearer_auth(&alice)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["price"], 10.0);
    Ok(())
}

#[tokio::test]
async fn product_routes_require_valid_token() -> Result<()> {
    let server = common::start_server().await?;
    let token = server.register("alice@example.com").await?;
    let user_id = TokenService::from_hours(&AppConfig::development().security.jwt_secret, 1)?.verify(&token)?;

    let res = server
        .client
        .post(server.url("/products"))
        .json(&json!({ "name": "Pen", "price": 10 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let expired = TokenService::new(&AppConfig::development().security.jwt_secret, chrono::Duration::hours(-1))?
        .issue(user_id)?;
    let forged = TokenService::from_hours("some-other-secret", 1)?.issue(user_id)?;

    for bad in [expired.as_str(), forged.as_str(), "garbage"] {
        let res = server
            .client
            .post(server.url("/products"))
            .bearer_auth(bad)
            .json(&json!({ "name": "Pen", "price": 10 }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await?;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    let list: Vec<Value> = server
        .client
        .get(server.url("/products/"))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert!(list.is_empty());
    Ok(())
}
