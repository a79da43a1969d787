//! Category repository.

use sqlx::PgPool;

use clover_core::CategoryId;

use super::RepositoryError;
use crate::models::Category;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, image_url, parent_id, created_at";

/// Repository for category reads.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, name-ordered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Resolve a slug to a category ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn id_by_slug(&self, slug: &str) -> Result<Option<CategoryId>, RepositoryError> {
        let row: Option<(CategoryId,)> =
            sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
                .bind(slug)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(|(id,)| id))
    }
}
