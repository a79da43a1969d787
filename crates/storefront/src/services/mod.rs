//! Application services.
//!
//! Services own the multi-step flows that sit between routes and
//! repositories: cart reconciliation across the anonymous/authenticated
//! boundary, and checkout orchestration.

pub mod cart;
pub mod checkout;

pub use cart::{CartError, CartService, CartView};
pub use checkout::{CheckoutError, CheckoutService};
