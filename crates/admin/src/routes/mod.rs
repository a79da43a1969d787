//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (DB ping)
//!
//! # Auth
//! POST   /auth/login                      - Establish admin session (role-gated)
//! POST   /auth/logout                     - Tear down session
//!
//! # Dashboard
//! GET    /dashboard                       - Aggregate metrics
//!
//! # Catalog management
//! GET    /products                        - All products, inactive included
//! POST   /products                        - Create product (+ image list)
//! GET    /products/{id}                   - One product
//! PUT    /products/{id}                   - Update; image set replaced wholesale
//! DELETE /products/{id}                   - Delete
//! POST   /products/{id}/images            - Multipart image upload, returns URLs
//! GET    /categories
//! POST   /categories
//! PUT    /categories/{id}
//! DELETE /categories/{id}
//!
//! # Order management
//! GET    /orders?status=                  - All orders, newest first
//! GET    /orders/{id}                     - Order with items
//! PUT    /orders/{id}/status              - Status change (state-machine checked)
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Assemble the full admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::show))
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/products/{id}/images", post(products::upload_images))
        .route("/categories", get(categories::index).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", put(orders::update_status))
}
