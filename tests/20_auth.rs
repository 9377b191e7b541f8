mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn signup_then_login_issue_tokens() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.signup("Ada", "Ada@Example.com").await?;
    assert_eq!(token.split('.').count(), 3, "not a JWT: {}", token);

    // Email is matched case-insensitively
    let res = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "ada@example.com", "password": "hunter22" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    Ok(())
}

#[tokio::test]
async fn signup_validates_input_and_duplicates() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(app.url("/api/auth/signup"))
        .json(&json!({ "name": "Ada", "email": "  " , "password": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "All fields are required");
    assert_eq!(body["code"], "BAD_REQUEST");

    app.signup("Ada", "ada@example.com").await?;
    let res = app
        .client
        .post(app.url("/api/auth/signup"))
        .json(&json!({ "name": "Other", "email": "ada@example.com", "password": "pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials_uniformly() -> Result<()> {
    let app = common::spawn_app().await?;
    app.signup("Ada", "ada@example.com").await?;

    for payload in [
        json!({ "email": "ada@example.com", "password": "wrong" }),
        json!({ "email": "nobody@example.com", "password": "hunter22" }),
    ] {
        let res = app.client.post(app.url("/api/auth/login")).json(&payload).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await?;
        assert_eq!(body["error"], "Invalid email or password");
    }
    Ok(())
}

#[tokio::test]
async fn protected_routes_check_the_token() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/api/protected")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Access denied. No token provided.");

    let res = app
        .client
        .get(app.url("/api/projects"))
        .bearer_auth("not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Invalid or expired token");

    let token = app.signup("Ada", "ada@example.com").await?;
    let res = app.client.get(app.url("/api/protected")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["message"], "Hello Ada, this is protected data.");
    Ok(())
}
