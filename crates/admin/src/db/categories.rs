//! Category management repository.

use serde::Deserialize;
use sqlx::PgPool;

use clover_core::{CategoryId, slug::slugify};

use super::{RepositoryError, map_unique_violation};
use crate::models::Category;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, image_url, parent_id, created_at";

/// New or updated category payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<CategoryId>,
}

/// Repository for category reads and writes.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, alphabetical.
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

    /// Create a category; the slug is derived from the name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a slug collision.
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as(&format!(
            "INSERT INTO categories (name, slug, description, image_url, parent_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(slugify(&input.name))
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(input.parent_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "A category with this name already exists"))?;
        Ok(row)
    }

    /// Update a category; the slug follows the name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID,
    /// `RepositoryError::Conflict` on a slug collision.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row: Option<Category> = sqlx::query_as(&format!(
            "UPDATE categories SET \
             name = $2, slug = $3, description = $4, image_url = $5, parent_id = $6 \
             WHERE id = $1 \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(slugify(&input.name))
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(input.parent_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "A category with this name already exists"))?;
        row.ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Products in it fall back to uncategorized via the
    /// FK's `ON DELETE SET NULL`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
