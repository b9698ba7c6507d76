//! Integration tests for registration, login, and session handling.
//!
//! These tests require a running server and database; see `orders_api.rs`.

use serde_json::{Value, json};
use shopmax_integration_tests::TestContext;

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_join_creates_session() {
    let ctx = TestContext::new();
    let body = ctx
        .register(&TestContext::unique_email("join"), "test-password")
        .await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["role"], json!("USER"));

    let resp = ctx
        .client
        .get(format!("{}/auth/status", ctx.base_url))
        .send()
        .await
        .expect("status request failed");
    let body: Value = resp.json().await.expect("invalid status response");
    assert_eq!(body["isAuthenticated"], json!(true));
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_duplicate_email_rejected() {
    let ctx = TestContext::new();
    let email = TestContext::unique_email("dup");
    ctx.register(&email, "test-password").await;

    let resp = ctx
        .client
        .post(format!("{}/auth/join", ctx.base_url))
        .json(&json!({
            "email": email,
            "name": "Second User",
            "password": "test-password",
        }))
        .send()
        .await
        .expect("join request failed");
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_wrong_password_rejected() {
    let ctx = TestContext::new();
    let email = TestContext::unique_email("login");
    ctx.register(&email, "test-password").await;

    let fresh = TestContext::new();
    let resp = fresh
        .client
        .post(format!("{}/auth/login", fresh.base_url))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_logout_clears_session() {
    let ctx = TestContext::new();
    ctx.register(&TestContext::unique_email("logout"), "test-password")
        .await;

    let resp = ctx
        .client
        .get(format!("{}/auth/logout", ctx.base_url))
        .send()
        .await
        .expect("logout request failed");
    assert_eq!(resp.status(), 200);

    let resp = ctx
        .client
        .get(format!("{}/auth/status", ctx.base_url))
        .send()
        .await
        .expect("status request failed");
    let body: Value = resp.json().await.expect("invalid status response");
    assert_eq!(body["isAuthenticated"], json!(false));
}
