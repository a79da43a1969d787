//! Shared type definitions.

pub mod address;
pub mod id;
pub mod status;

pub use address::ShippingAddress;
pub use id::*;
pub use status::{AppRole, OrderStatus};
