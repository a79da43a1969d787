//! Order management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clover_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::db::orders::StatusUpdate;
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{AdminOrder, OrderItem};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

/// Order header plus its line-item snapshots.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: AdminOrder,
    pub items: Vec<OrderItem>,
}

/// GET /orders
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AdminOrder>>> {
    let orders = OrderRepository::new(state.pool()).list(query.status).await?;
    Ok(Json(orders))
}

/// GET /orders/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    let (order, items) = OrderRepository::new(state.pool())
        .get(order_id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("order {order_id}")))?;
    Ok(Json(OrderDetail { order, items }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PUT /orders/{id}/status
///
/// Rejected moves return 422 with the current and requested statuses.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<AdminOrder>> {
    match OrderRepository::new(state.pool())
        .update_status(order_id, body.status)
        .await?
    {
        StatusUpdate::Updated(order) => {
            tracing::info!(%order_id, status = %body.status, "Order status changed");
            Ok(Json(order))
        }
        StatusUpdate::Rejected(current) => Err(AdminError::InvalidTransition {
            from: current,
            to: body.status,
        }),
    }
}
