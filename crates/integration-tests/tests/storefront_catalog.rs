//! Catalog browsing against a running storefront server.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Seeded catalog data (cargo run -p clover-cli -- seed)
//! - The storefront server running (cargo run -p clover-storefront)

use std::str::FromStr;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;

use clover_integration_tests::{session_client, storefront_base_url};

fn price_of(product: &Value) -> Decimal {
    Decimal::from_str(product["price"].as_str().expect("price string")).expect("parseable price")
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn listing_defaults_to_newest_first() {
    let client = session_client();
    let base = storefront_base_url();

    let products: Vec<Value> = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("catalog request")
        .json()
        .await
        .expect("catalog body");
    assert!(!products.is_empty());

    let created: Vec<&str> = products
        .iter()
        .map(|p| p["created_at"].as_str().expect("timestamp"))
        .collect();
    let mut sorted = created.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(created, sorted);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn price_sort_and_range_filter_agree() {
    let client = session_client();
    let base = storefront_base_url();

    let products: Vec<Value> = client
        .get(format!("{base}/products?sort=price-asc&min_price=10&max_price=60"))
        .send()
        .await
        .expect("catalog request")
        .json()
        .await
        .expect("catalog body");

    let prices: Vec<Decimal> = products.iter().map(price_of).collect();
    let mut sorted = prices.clone();
    sorted.sort();
    assert_eq!(prices, sorted);
    for price in prices {
        assert!(price >= Decimal::from(10) && price <= Decimal::from(60));
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn category_slug_filters_the_listing() {
    let client = session_client();
    let base = storefront_base_url();

    let categories: Vec<Value> = client
        .get(format!("{base}/categories"))
        .send()
        .await
        .expect("categories request")
        .json()
        .await
        .expect("categories body");
    let category = &categories[0];
    let slug = category["slug"].as_str().expect("category slug");

    let products: Vec<Value> = client
        .get(format!("{base}/products?category={slug}"))
        .send()
        .await
        .expect("filtered request")
        .json()
        .await
        .expect("filtered body");

    for product in &products {
        assert_eq!(product["category"]["slug"], *slug);
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn unknown_category_slug_is_ignored() {
    let client = session_client();
    let base = storefront_base_url();

    let all: Vec<Value> = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("catalog request")
        .json()
        .await
        .expect("catalog body");
    let filtered: Vec<Value> = client
        .get(format!("{base}/products?category=no-such-category"))
        .send()
        .await
        .expect("filtered request")
        .json()
        .await
        .expect("filtered body");

    assert_eq!(all.len(), filtered.len());
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn product_detail_resolves_by_slug() {
    let client = session_client();
    let base = storefront_base_url();

    let products: Vec<Value> = client
        .get(format!("{base}/products"))
        .send()
        .await
        .expect("catalog request")
        .json()
        .await
        .expect("catalog body");
    let slug = products[0]["slug"].as_str().expect("slug");

    let resp = client
        .get(format!("{base}/products/{slug}"))
        .send()
        .await
        .expect("detail request");
    assert_eq!(resp.status(), StatusCode::OK);

    let detail: Value = resp.json().await.expect("detail body");
    assert_eq!(detail["slug"], *slug);
    assert!(detail["reviews"].is_array());

    let missing = client
        .get(format!("{base}/products/definitely-not-a-product"))
        .send()
        .await
        .expect("missing request");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn bad_sort_key_is_a_client_error() {
    let client = session_client();
    let base = storefront_base_url();

    let resp = client
        .get(format!("{base}/products?sort=sideways"))
        .send()
        .await
        .expect("catalog request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
