//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use clover_core::ProductId;

use crate::db::WishlistRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::WishlistEntry;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub product_id: ProductId,
}

/// GET /wishlist
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<WishlistEntry>>> {
    let entries = WishlistRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(entries))
}

/// POST /wishlist/items
///
/// Idempotent: adding a product already on the wishlist is a no-op.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddRequest>,
) -> Result<StatusCode> {
    WishlistRepository::new(state.pool())
        .add(user.id, body.product_id)
        .await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /wishlist/items/{product_id}
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    WishlistRepository::new(state.pool())
        .remove(user.id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
