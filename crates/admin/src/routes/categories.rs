//! Category management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use clover_core::CategoryId;

use crate::db::CategoryRepository;
use crate::db::categories::CategoryInput;
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Category;
use crate::state::AppState;

/// GET /categories
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// POST /categories
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    if body.name.trim().is_empty() {
        return Err(AdminError::BadRequest("Category name is required".to_owned()));
    }
    let category = CategoryRepository::new(state.pool()).create(&body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/{id}
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(body): Json<CategoryInput>,
) -> Result<Json<Category>> {
    if body.name.trim().is_empty() {
        return Err(AdminError::BadRequest("Category name is required".to_owned()));
    }
    let category = CategoryRepository::new(state.pool())
        .update(id, &body)
        .await?;
    Ok(Json(category))
}

/// DELETE /categories/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    CategoryRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
