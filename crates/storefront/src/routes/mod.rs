//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Liveness check
//! GET    /health/ready                  - Readiness check (DB ping)
//!
//! # Catalog
//! GET    /products                      - Catalog listing (search/filter/sort)
//! GET    /products/{slug}               - Product detail with reviews
//! POST   /products/{slug}/reviews       - Post a review (auth)
//! GET    /categories                    - Category listing
//!
//! # Cart (anonymous or authenticated)
//! GET    /cart                          - Current cart with aggregates
//! GET    /cart/count                    - Item count only
//! POST   /cart/items                    - Add item
//! PUT    /cart/items/{product_id}       - Set absolute quantity
//! DELETE /cart/items/{product_id}       - Remove item
//! DELETE /cart                          - Clear cart
//!
//! # Checkout & orders (auth)
//! POST   /checkout                      - Place order from the cart
//! GET    /orders                        - Order history, newest first
//! GET    /orders/{id}                   - Order detail with items
//!
//! # Wishlist (auth)
//! GET    /wishlist
//! POST   /wishlist/items
//! DELETE /wishlist/items/{product_id}
//!
//! # Account (auth)
//! GET    /account/profile
//! PUT    /account/profile
//! GET    /account/addresses
//! POST   /account/addresses
//! DELETE /account/addresses/{id}
//!
//! # Auth
//! POST   /auth/login                    - Establish session (fires cart merge)
//! POST   /auth/logout                   - Tear down session
//! GET    /auth/me                       - Current identity, if any
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Assemble the full storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/products/{slug}/reviews", post(reviews::create))
        .route("/categories", get(products::categories))
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/count", get(cart::count))
        .route("/cart/items", post(cart::add))
        .route(
            "/cart/items/{product_id}",
            put(cart::update).delete(cart::remove),
        )
        .route("/checkout", post(checkout::place_order))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/wishlist", get(wishlist::index))
        .route("/wishlist/items", post(wishlist::add))
        .route("/wishlist/items/{product_id}", delete(wishlist::remove))
        .route(
            "/account/profile",
            get(account::profile).put(account::update_profile),
        )
        .route(
            "/account/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route("/account/addresses/{id}", delete(account::delete_address))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}
