//! Product review repository.

use sqlx::PgPool;

use clover_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::Review;

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews for a product with the reviewer's display name, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as(
            "SELECT r.id, r.product_id, r.user_id, r.rating, r.title, r.content, \
                    pr.full_name AS reviewer_name, r.created_at \
             FROM reviews r \
             LEFT JOIN profiles pr ON pr.user_id = r.user_id \
             WHERE r.product_id = $1 \
             ORDER BY r.created_at DESC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Post a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails (including a
    /// rating outside 1..=5, enforced by a check constraint).
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: UserId,
        rating: i32,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as(
            "INSERT INTO reviews (product_id, user_id, rating, title, content) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, product_id, user_id, rating, title, content, \
                       NULL::text AS reviewer_name, created_at",
        )
        .bind(product_id)
        .bind(user_id)
        .bind(rating)
        .bind(title)
        .bind(content)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }
}
