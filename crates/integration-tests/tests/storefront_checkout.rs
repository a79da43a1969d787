//! End-to-end checkout against a running storefront server.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Seeded catalog data (cargo run -p clover-cli -- seed)
//! - The storefront server running (cargo run -p clover-storefront)

use std::str::FromStr;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use clover_integration_tests::{session_client, storefront_base_url, unique_email};

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal string")).expect("parseable decimal")
}

fn shipping_address() -> Value {
    json!({
        "full_name": "Test Shopper",
        "street_address": "1 Clover Way",
        "city": "Portland",
        "state": "OR",
        "postal_code": "97201",
        "country": "US"
    })
}

/// Sign in with a fresh account and put `quantity` of some product in the
/// cart; returns the cart subtotal.
async fn prepare_cart(client: &reqwest::Client, quantity: u32) -> Decimal {
    let base = storefront_base_url();

    client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": unique_email("checkout") }))
        .send()
        .await
        .expect("login");

    let products: Vec<Value> = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("catalog request")
        .json()
        .await
        .expect("catalog body");
    let product_id = products[0]["id"].as_str().expect("product id");

    let cart: Value = client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("add to cart")
        .json()
        .await
        .expect("cart body");
    decimal(&cart["subtotal"])
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn checkout_totals_follow_the_pricing_rules() {
    let client = session_client();
    let base = storefront_base_url();
    let subtotal = prepare_cart(&client, 2).await;

    let resp = client
        .post(format!("{base}/checkout"))
        .json(&json!({ "shipping_address": shipping_address() }))
        .send()
        .await
        .expect("checkout");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Value = resp.json().await.expect("order body");
    assert_eq!(order["status"], "pending");
    assert_eq!(decimal(&order["subtotal"]), subtotal);

    let shipping = decimal(&order["shipping_cost"]);
    let expected_shipping = if subtotal >= dec!(100.00) {
        Decimal::ZERO
    } else {
        dec!(9.99)
    };
    assert_eq!(shipping, expected_shipping);

    let tax = decimal(&order["tax"]);
    assert_eq!(tax, (subtotal * dec!(0.08)).round_dp(2));

    assert_eq!(decimal(&order["total"]), subtotal + shipping + tax);
    assert!(!order["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn checkout_empties_the_cart_and_records_the_order() {
    let client = session_client();
    let base = storefront_base_url();
    prepare_cart(&client, 1).await;

    let order: Value = client
        .post(format!("{base}/checkout"))
        .json(&json!({ "shipping_address": shipping_address() }))
        .send()
        .await
        .expect("checkout")
        .json()
        .await
        .expect("order body");
    let order_id = order["id"].as_str().expect("order id");

    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart read")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["item_count"], 0);

    let history: Vec<Value> = client
        .get(format!("{base}/orders"))
        .send()
        .await
        .expect("order history")
        .json()
        .await
        .expect("history body");
    assert!(history.iter().any(|o| o["id"] == order_id));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn empty_cart_checkout_is_rejected() {
    let client = session_client();
    let base = storefront_base_url();

    client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": unique_email("empty-checkout") }))
        .send()
        .await
        .expect("login");

    let resp = client
        .post(format!("{base}/checkout"))
        .json(&json!({ "shipping_address": shipping_address() }))
        .send()
        .await
        .expect("checkout");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn incomplete_address_is_rejected_before_any_write() {
    let client = session_client();
    let base = storefront_base_url();
    prepare_cart(&client, 1).await;

    let resp = client
        .post(format!("{base}/checkout"))
        .json(&json!({ "shipping_address": {
            "full_name": "Test Shopper",
            "street_address": "",
            "city": "Portland",
            "state": "OR",
            "postal_code": "97201",
            "country": "US"
        }}))
        .send()
        .await
        .expect("checkout");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The cart is untouched by the failed attempt.
    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart read")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["item_count"], 1);
}
