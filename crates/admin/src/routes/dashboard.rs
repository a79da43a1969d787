//! Dashboard route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::{MetricsRepository, ProductRepository};
use crate::db::metrics::DashboardMetrics;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// GET /dashboard
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<DashboardMetrics>> {
    let total_products = ProductRepository::new(state.pool()).count().await?;
    let metrics = MetricsRepository::new(state.pool())
        .dashboard(total_products)
        .await?;
    Ok(Json(metrics))
}
