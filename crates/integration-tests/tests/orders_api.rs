//! Integration tests for the order API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (shopmax-cli migrate)
//! - The server running (cargo run -p shopmax-server)
//! - An admin account, reachable via `SHOPMAX_ADMIN_EMAIL` /
//!   `SHOPMAX_ADMIN_PASSWORD` (create one with `shopmax-cli admin create`)
//!
//! Run with: cargo test -p shopmax-integration-tests -- --ignored

use serde_json::{Value, json};
use shopmax_integration_tests::TestContext;

/// Log in as the admin configured in the environment.
async fn admin_context() -> TestContext {
    let ctx = TestContext::new();
    let email = std::env::var("SHOPMAX_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@test.shopmax.dev".to_string());
    let password =
        std::env::var("SHOPMAX_ADMIN_PASSWORD").unwrap_or_else(|_| "integration-admin".to_string());

    let resp = ctx
        .client
        .post(format!("{}/auth/login", ctx.base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("admin login request failed");
    assert_eq!(resp.status(), 200, "admin login should succeed");

    ctx
}

/// Create a fresh item via the admin API and return its id.
async fn create_item(admin: &TestContext, price: i64, stock: i32) -> i32 {
    let resp = admin
        .client
        .post(format!("{}/item", admin.base_url))
        .json(&json!({
            "name": "Integration Test Item",
            "price": price,
            "stockNumber": stock,
            "detail": "created by orders_api integration test",
        }))
        .send()
        .await
        .expect("item creation request failed");
    assert_eq!(resp.status(), 201, "item creation should succeed");

    let body: Value = resp.json().await.expect("invalid item response");
    i32::try_from(body["item"]["id"].as_i64().expect("item id")).expect("item id fits i32")
}

/// Fetch an item's current stock and sell status.
async fn item_state(ctx: &TestContext, item_id: i32) -> (i64, String) {
    let resp = ctx
        .client
        .get(format!("{}/item/{item_id}", ctx.base_url))
        .send()
        .await
        .expect("item detail request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("invalid item detail");
    (
        body["item"]["stockNumber"].as_i64().expect("stock number"),
        body["item"]["sellStatus"]
            .as_str()
            .expect("sell status")
            .to_string(),
    )
}

/// Place an order for a single item and return the raw response.
async fn place_order(ctx: &TestContext, item_id: i32, count: i32) -> reqwest::Response {
    ctx.client
        .post(format!("{}/order", ctx.base_url))
        .json(&json!({ "items": [{ "itemId": item_id, "count": count }] }))
        .send()
        .await
        .expect("order request failed")
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_place_order_decrements_stock_and_snapshots_price() {
    let admin = admin_context().await;
    let item_id = create_item(&admin, 100, 5).await;

    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = place_order(&user, item_id, 3).await;
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.expect("invalid order response");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["totalPrice"], json!(300));
    assert!(body["orderId"].as_i64().is_some());

    let (stock, status) = item_state(&user, item_id).await;
    assert_eq!(stock, 2);
    assert_eq!(status, "SELL");
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_insufficient_stock_leaves_everything_untouched() {
    let admin = admin_context().await;
    let item_id = create_item(&admin, 100, 2).await;

    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = place_order(&user, item_id, 3).await;
    assert_eq!(resp.status(), 409);

    let body: Value = resp.json().await.expect("invalid error response");
    assert_eq!(body["success"], json!(false));

    // Stock must be unchanged and no order recorded
    let (stock, _) = item_state(&user, item_id).await;
    assert_eq!(stock, 2);

    let resp = user
        .client
        .get(format!("{}/order/list", user.base_url))
        .send()
        .await
        .expect("list request failed");
    let body: Value = resp.json().await.expect("invalid list response");
    assert_eq!(body["pagination"]["totalOrder"], json!(0));
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_last_unit_flips_item_to_sold_out() {
    let admin = admin_context().await;
    let item_id = create_item(&admin, 100, 3).await;

    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = place_order(&user, item_id, 3).await;
    assert_eq!(resp.status(), 201);

    let (stock, status) = item_state(&user, item_id).await;
    assert_eq!(stock, 0);
    assert_eq!(status, "SOLD_OUT");
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_cancel_restores_stock_and_second_cancel_fails() {
    let admin = admin_context().await;
    let item_id = create_item(&admin, 100, 5).await;

    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = place_order(&user, item_id, 3).await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("invalid order response");
    let order_id = body["orderId"].as_i64().expect("order id");

    let resp = user
        .client
        .post(format!("{}/order/cancel/{order_id}", user.base_url))
        .send()
        .await
        .expect("cancel request failed");
    assert_eq!(resp.status(), 200);

    let (stock, status) = item_state(&user, item_id).await;
    assert_eq!(stock, 5);
    assert_eq!(status, "SELL");

    // A second cancellation is an error, not a no-op
    let resp = user
        .client
        .post(format!("{}/order/cancel/{order_id}", user.base_url))
        .send()
        .await
        .expect("cancel request failed");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_cancelled_order_stays_in_listing_with_cancel_status() {
    let admin = admin_context().await;
    let item_id = create_item(&admin, 100, 5).await;

    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = place_order(&user, item_id, 1).await;
    let body: Value = resp.json().await.expect("invalid order response");
    let order_id = body["orderId"].as_i64().expect("order id");

    user.client
        .post(format!("{}/order/cancel/{order_id}", user.base_url))
        .send()
        .await
        .expect("cancel request failed");

    let resp = user
        .client
        .get(format!("{}/order/list", user.base_url))
        .send()
        .await
        .expect("list request failed");
    let body: Value = resp.json().await.expect("invalid list response");
    let orders = body["orders"].as_array().expect("orders array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], json!("CANCEL"));
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_listing_pagination_defaults() {
    let admin = admin_context().await;
    let item_id = create_item(&admin, 100, 50).await;

    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    for _ in 0..6 {
        let resp = place_order(&user, item_id, 1).await;
        assert_eq!(resp.status(), 201);
    }

    // Default page size is 5, newest first
    let resp = user
        .client
        .get(format!("{}/order/list", user.base_url))
        .send()
        .await
        .expect("list request failed");
    let body: Value = resp.json().await.expect("invalid list response");
    assert_eq!(body["orders"].as_array().expect("orders").len(), 5);
    assert_eq!(body["pagination"]["totalOrder"], json!(6));
    assert_eq!(body["pagination"]["totalPages"], json!(2));
    assert_eq!(body["pagination"]["currentPage"], json!(1));

    let resp = user
        .client
        .get(format!("{}/order/list?page=2", user.base_url))
        .send()
        .await
        .expect("list request failed");
    let body: Value = resp.json().await.expect("invalid list response");
    assert_eq!(body["orders"].as_array().expect("orders").len(), 1);
    assert_eq!(body["pagination"]["currentPage"], json!(2));
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_order_requires_login() {
    let anonymous = TestContext::new();
    let resp = place_order(&anonymous, 1, 1).await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_empty_and_duplicate_orders_rejected() {
    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = user
        .client
        .post(format!("{}/order", user.base_url))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .expect("order request failed");
    assert_eq!(resp.status(), 400);

    let resp = user
        .client
        .post(format!("{}/order", user.base_url))
        .json(&json!({ "items": [
            { "itemId": 1, "count": 1 },
            { "itemId": 1, "count": 2 },
        ] }))
        .send()
        .await
        .expect("order request failed");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_unknown_item_fails_with_no_partial_state() {
    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = place_order(&user, i32::MAX, 1).await;
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.expect("invalid error response");
    assert_eq!(body["success"], json!(false));

    // The rolled-back order header must not be visible
    let resp = user
        .client
        .get(format!("{}/order/list", user.base_url))
        .send()
        .await
        .expect("list request failed");
    let body: Value = resp.json().await.expect("invalid list response");
    assert_eq!(body["pagination"]["totalOrder"], json!(0));
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_cancel_unknown_order_is_not_found() {
    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = user
        .client
        .post(format!("{}/order/cancel/{}", user.base_url, i32::MAX))
        .send()
        .await
        .expect("cancel request failed");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore = "requires running server, database, and admin account"]
async fn test_delete_is_admin_only_and_cascades() {
    let admin = admin_context().await;
    let item_id = create_item(&admin, 100, 5).await;

    let user = TestContext::new();
    user.register(&TestContext::unique_email("buyer"), "test-password")
        .await;

    let resp = place_order(&user, item_id, 1).await;
    let body: Value = resp.json().await.expect("invalid order response");
    let order_id = body["orderId"].as_i64().expect("order id");

    // Regular users may not delete
    let resp = user
        .client
        .delete(format!("{}/order/delete/{order_id}", user.base_url))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 403);

    // Admins may; a second delete is a 404
    let resp = admin
        .client
        .delete(format!("{}/order/delete/{order_id}", admin.base_url))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 200);

    let resp = admin
        .client
        .delete(format!("{}/order/delete/{order_id}", admin.base_url))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 404);
}
