//! Integration tests for Clover Market.
//!
//! # Running Tests
//!
//! ```bash
//! # Run migrations and seed data
//! cargo run -p clover-cli -- migrate
//! cargo run -p clover-cli -- seed
//!
//! # Start both servers
//! cargo run -p clover-storefront &
//! cargo run -p clover-admin &
//!
//! # Run the ignored end-to-end tests
//! cargo test -p clover-integration-tests -- --ignored
//! ```
//!
//! Base URLs are configurable via `STOREFRONT_BASE_URL` and
//! `ADMIN_BASE_URL`; they default to the local development ports.

use reqwest::Client;

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// HTTP client with a cookie store, so sessions persist across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed (test-only code).
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email per test run, so repeated runs never collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@integration.test", uuid::Uuid::new_v4())
}
