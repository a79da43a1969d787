//! Clover Core - Shared types and pure commerce logic.
//!
//! This crate provides the common vocabulary used across all Clover Market
//! components:
//! - `storefront` - Public-facing shop API
//! - `admin` - Back-office API (dashboard, catalog management, orders)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! the cart, pricing, and catalog-filter logic to be tested without any
//! running infrastructure.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, order status state machine, shipping address
//! - [`cart`] - Cart line model shared by the anonymous and persisted carts
//! - [`pricing`] - Shipping/tax/total quote computation
//! - [`catalog`] - Product filter specification for catalog queries
//! - [`slug`] - URL-safe slug generation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod pricing;
pub mod slug;
pub mod types;

pub use types::*;
