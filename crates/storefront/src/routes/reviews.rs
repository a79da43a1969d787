//! Review route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Review;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// POST /products/{slug}/reviews
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(slug): Path<String>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_owned(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug, false)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let review = ReviewRepository::new(state.pool())
        .create(
            product.product.id,
            user.id,
            body.rating,
            body.title.as_deref(),
            body.content.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}
