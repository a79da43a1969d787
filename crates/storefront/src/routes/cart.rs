//! Cart route handlers.
//!
//! Every handler works for both anonymous and signed-in requests; the
//! [`CartService`] picks the backing store from the presence of a session
//! identity. Handlers return the refreshed [`CartView`] so clients never
//! need a follow-up read after a mutation.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use clover_core::ProductId;

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::services::{CartService, CartView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    /// Defaults to 1, matching the storefront "add to cart" button.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

/// GET /cart
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartView>> {
    let service = CartService::new(state.pool(), state.config().cart_merge);
    let view = service.view(&session, user.as_ref()).await?;
    Ok(Json(view))
}

/// GET /cart/count
#[instrument(skip(state, session, user))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<serde_json::Value>> {
    let service = CartService::new(state.pool(), state.config().cart_merge);
    let view = service.view(&session, user.as_ref()).await?;
    Ok(Json(json!({ "count": view.item_count })))
}

/// POST /cart/items
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    let service = CartService::new(state.pool(), state.config().cart_merge);
    service
        .add_item(&session, user.as_ref(), body.product_id, body.quantity)
        .await?;
    let view = service.view(&session, user.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /cart/items/{product_id}
#[instrument(skip(state, session, user))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(product_id): Path<ProductId>,
    Json(body): Json<SetQuantityRequest>,
) -> Result<Json<CartView>> {
    let service = CartService::new(state.pool(), state.config().cart_merge);
    service
        .set_quantity(&session, user.as_ref(), product_id, body.quantity)
        .await?;
    let view = service.view(&session, user.as_ref()).await?;
    Ok(Json(view))
}

/// DELETE /cart/items/{product_id}
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let service = CartService::new(state.pool(), state.config().cart_merge);
    service
        .remove_item(&session, user.as_ref(), product_id)
        .await?;
    let view = service.view(&session, user.as_ref()).await?;
    Ok(Json(view))
}

/// DELETE /cart
#[instrument(skip(state, session, user))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartView>> {
    let service = CartService::new(state.pool(), state.config().cart_merge);
    service.clear(&session, user.as_ref()).await?;
    Ok(Json(CartView::empty()))
}
