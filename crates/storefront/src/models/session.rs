//! Session-stored types.

use serde::{Deserialize, Serialize};

use clover_core::UserId;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in user. Its
/// absence means the request is anonymous and cart operations work against
/// the session-local cart instead of the persisted one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}

/// Session keys.
pub mod keys {
    /// Key for the signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the anonymous cart: a JSON array of
    /// `{product_id, quantity}`, the device-local cart with no server
    /// identity until merged on login.
    pub const LOCAL_CART: &str = "cart";
}
