//! End-to-end cart flow against a running storefront server.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Seeded catalog data (cargo run -p clover-cli -- seed)
//! - The storefront server running (cargo run -p clover-storefront)

use reqwest::StatusCode;
use serde_json::{Value, json};

use clover_integration_tests::{session_client, storefront_base_url, unique_email};

/// Fetch any product from the catalog to exercise the cart with.
async fn any_product(client: &reqwest::Client) -> Value {
    let base = storefront_base_url();
    let products: Vec<Value> = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("catalog request")
        .json()
        .await
        .expect("catalog body");
    products.into_iter().next().expect("seeded catalog is not empty")
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn anonymous_cart_add_and_count() {
    let client = session_client();
    let base = storefront_base_url();
    let product = any_product(&client).await;
    let product_id = product["id"].as_str().expect("product id");

    let resp = client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let cart: Value = resp.json().await.expect("cart body");
    assert_eq!(cart["item_count"], 2);

    // Adding the same product again merges into the existing line.
    let cart: Value = client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("second add")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["item_count"], 3);
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn set_quantity_zero_removes_the_line() {
    let client = session_client();
    let base = storefront_base_url();
    let product = any_product(&client).await;
    let product_id = product["id"].as_str().expect("product id");

    client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 4 }))
        .send()
        .await
        .expect("add to cart");

    let cart: Value = client
        .put(format!("{base}/cart/items/{product_id}"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("set quantity")
        .json()
        .await
        .expect("cart body");

    assert_eq!(cart["item_count"], 0);
    assert!(cart["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn login_merges_anonymous_cart() {
    let client = session_client();
    let base = storefront_base_url();
    let product = any_product(&client).await;
    let product_id = product["id"].as_str().expect("product id");

    // Build up an anonymous cart first.
    client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("anonymous add");

    // Fresh account: the merged cart is the only content.
    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": unique_email("cart-merge") }))
        .send()
        .await
        .expect("login");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart read")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["item_count"], 2);
    assert_eq!(
        cart["items"][0]["product_id"].as_str().expect("line product"),
        product_id
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn logout_leaves_a_clean_anonymous_cart() {
    let client = session_client();
    let base = storefront_base_url();
    let product = any_product(&client).await;
    let product_id = product["id"].as_str().expect("product id");

    client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": unique_email("cart-logout") }))
        .send()
        .await
        .expect("login");
    client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("add while signed in");

    let resp = client
        .post(format!("{base}/auth/logout"))
        .send()
        .await
        .expect("logout");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart read")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["item_count"], 0);
}
