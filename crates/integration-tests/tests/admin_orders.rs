//! Admin order management against running servers.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data
//! - Both servers running (clover-storefront on 3000, clover-admin on 3001)
//! - An admin account: cargo run -p clover-cli -- admin grant -e admin@integration.test

use reqwest::StatusCode;
use serde_json::{Value, json};

use clover_integration_tests::{
    admin_base_url, session_client, storefront_base_url, unique_email,
};

/// Email expected to hold the admin role (granted via the CLI beforehand).
fn admin_email() -> String {
    std::env::var("ADMIN_TEST_EMAIL").unwrap_or_else(|_| "admin@integration.test".to_string())
}

/// Sign in to the admin API; the returned client carries the session.
async fn admin_client() -> reqwest::Client {
    let client = session_client();
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": admin_email() }))
        .send()
        .await
        .expect("admin login");
    assert_eq!(resp.status(), StatusCode::OK, "admin role must be granted");
    client
}

/// Place an order through the storefront and return its id.
async fn place_order() -> String {
    let client = session_client();
    let base = storefront_base_url();

    client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": unique_email("admin-orders") }))
        .send()
        .await
        .expect("shopper login");

    let products: Vec<Value> = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("catalog")
        .json()
        .await
        .expect("catalog body");
    let product_id = products[0]["id"].as_str().expect("product id");

    client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("add to cart");

    let order: Value = client
        .post(format!("{base}/checkout"))
        .json(&json!({ "shipping_address": {
            "full_name": "Admin Flow",
            "street_address": "1 Clover Way",
            "city": "Portland",
            "state": "OR",
            "postal_code": "97201",
            "country": "US"
        }}))
        .send()
        .await
        .expect("checkout")
        .json()
        .await
        .expect("order body");
    order["id"].as_str().expect("order id").to_owned()
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers with an admin account"]
async fn dashboard_requires_a_session() {
    let anonymous = session_client();
    let resp = anonymous
        .get(format!("{}/dashboard", admin_base_url()))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let admin = admin_client().await;
    let metrics: Value = admin
        .get(format!("{}/dashboard", admin_base_url()))
        .send()
        .await
        .expect("dashboard request")
        .json()
        .await
        .expect("dashboard body");
    assert!(metrics["total_orders"].as_i64().expect("order count") >= 0);
    assert_eq!(metrics["sales_by_day"].as_array().expect("series").len(), 7);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers with an admin account"]
async fn order_status_walks_the_state_machine() {
    let order_id = place_order().await;
    let admin = admin_client().await;
    let base = admin_base_url();

    for status in ["processing", "shipped", "delivered"] {
        let resp = admin
            .put(format!("{base}/orders/{order_id}/status"))
            .json(&json!({ "status": status }))
            .send()
            .await
            .expect("status update");
        assert_eq!(resp.status(), StatusCode::OK, "move to {status}");
        let order: Value = resp.json().await.expect("order body");
        assert_eq!(order["status"], status);
    }
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers with an admin account"]
async fn illegal_transitions_are_rejected() {
    let order_id = place_order().await;
    let admin = admin_client().await;
    let base = admin_base_url();

    // pending -> delivered skips two states.
    let resp = admin
        .put(format!("{base}/orders/{order_id}/status"))
        .json(&json!({ "status": "delivered" }))
        .send()
        .await
        .expect("status update");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Repeating the current status is allowed (no-op submit).
    let resp = admin
        .put(format!("{base}/orders/{order_id}/status"))
        .json(&json!({ "status": "pending" }))
        .send()
        .await
        .expect("status update");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers with an admin account"]
async fn canceled_orders_are_terminal() {
    let order_id = place_order().await;
    let admin = admin_client().await;
    let base = admin_base_url();

    let resp = admin
        .put(format!("{base}/orders/{order_id}/status"))
        .json(&json!({ "status": "canceled" }))
        .send()
        .await
        .expect("cancel");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .put(format!("{base}/orders/{order_id}/status"))
        .json(&json!({ "status": "processing" }))
        .send()
        .await
        .expect("reopen attempt");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers with an admin account"]
async fn non_admin_accounts_cannot_sign_in() {
    let client = session_client();
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": unique_email("not-an-admin") }))
        .send()
        .await
        .expect("login attempt");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
