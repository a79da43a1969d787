//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use clover_core::ShippingAddress;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::routes::orders::OrderDetail;
use crate::services::CheckoutService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
}

/// POST /checkout
///
/// Places an order from the authenticated user's persisted cart. The order
/// header and its item snapshots are written in one transaction; the cart
/// is emptied afterwards.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderDetail>)> {
    let order = CheckoutService::new(state.pool())
        .place_order(&user, body.shipping_address)
        .await?;

    let items = OrderRepository::new(state.pool())
        .items_for_order(order.id)
        .await?;

    Ok((StatusCode::CREATED, Json(OrderDetail { order, items })))
}
