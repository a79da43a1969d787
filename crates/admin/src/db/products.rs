//! Catalog management repository.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use clover_core::{CategoryId, ProductId, slug::slugify};

use super::{RepositoryError, map_unique_violation};
use crate::models::{Product, ProductImage, ProductWithImages};

const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, compare_at_price, category_id, \
                               stock_quantity, is_featured, is_active, created_at, updated_at";

/// New or updated product payload. The slug is derived from the name, never
/// supplied by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// One image in a product's submitted image list. Position is the index in
/// the list; the stored set is replaced wholesale on every edit.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    pub url: String,
    pub alt_text: Option<String>,
}

/// Repository for catalog writes and admin reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, active and inactive, newest first, with images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<ProductWithImages>, RepositoryError> {
        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        self.attach_images(products).await
    }

    /// One product by ID, with images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductWithImages>, RepositoryError> {
        let product: Option<Product> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        match product {
            Some(p) => Ok(self.attach_images(vec![p]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Create a product and its image list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the derived slug collides
    /// with an existing product, `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        input: &ProductInput,
        images: &[ImageInput],
    ) -> Result<ProductWithImages, RepositoryError> {
        let slug = slugify(&input.name);
        let mut tx = self.pool.begin().await?;

        let product: Product = sqlx::query_as(&format!(
            "INSERT INTO products \
             (name, slug, description, price, compare_at_price, category_id, \
              stock_quantity, is_featured, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&slug)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.compare_at_price)
        .bind(input.category_id)
        .bind(input.stock_quantity)
        .bind(input.is_featured)
        .bind(input.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "A product with this name already exists"))?;

        let images = insert_images(&mut tx, product.id, images).await?;
        tx.commit().await?;

        Ok(ProductWithImages { product, images })
    }

    /// Update a product. The slug follows the name, and the image set is
    /// replaced with the submitted list (delete-all, then insert with
    /// positions `0..n`), matching how the catalog editor submits edits.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID,
    /// `RepositoryError::Conflict` on a slug collision.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
        images: &[ImageInput],
    ) -> Result<ProductWithImages, RepositoryError> {
        let slug = slugify(&input.name);
        let mut tx = self.pool.begin().await?;

        let product: Option<Product> = sqlx::query_as(&format!(
            "UPDATE products SET \
             name = $2, slug = $3, description = $4, price = $5, \
             compare_at_price = $6, category_id = $7, stock_quantity = $8, \
             is_featured = $9, is_active = $10, updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&slug)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.compare_at_price)
        .bind(input.category_id)
        .bind(input.stock_quantity)
        .bind(input.is_featured)
        .bind(input.is_active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "A product with this name already exists"))?;

        let Some(product) = product else {
            return Err(RepositoryError::NotFound);
        };

        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let images = insert_images(&mut tx, product.id, images).await?;
        tx.commit().await?;

        Ok(ProductWithImages { product, images })
    }

    /// Delete a product. Order item snapshots survive (their `product_id`
    /// nulls out via the FK), carts lose the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Total product count, for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    async fn attach_images(
        &self,
        products: Vec<Product>,
    ) -> Result<Vec<ProductWithImages>, RepositoryError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<uuid::Uuid> = products.iter().map(|p| p.id.as_uuid()).collect();
        let images: Vec<ProductImage> = sqlx::query_as(
            "SELECT id, product_id, url, alt_text, position, created_at \
             FROM product_images WHERE product_id = ANY($1) \
             ORDER BY product_id, position",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_product: HashMap<ProductId, Vec<ProductImage>> = HashMap::new();
        for image in images {
            by_product.entry(image.product_id).or_default().push(image);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let images = by_product.remove(&product.id).unwrap_or_default();
                ProductWithImages { product, images }
            })
            .collect())
    }
}

/// Insert an image list with positions assigned from list order.
async fn insert_images(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: ProductId,
    images: &[ImageInput],
) -> Result<Vec<ProductImage>, RepositoryError> {
    let mut inserted = Vec::with_capacity(images.len());
    for (position, image) in images.iter().enumerate() {
        let row: ProductImage = sqlx::query_as(
            "INSERT INTO product_images (product_id, url, alt_text, position) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, product_id, url, alt_text, position, created_at",
        )
        .bind(product_id)
        .bind(&image.url)
        .bind(&image.alt_text)
        .bind(i32::try_from(position).unwrap_or(i32::MAX))
        .fetch_one(&mut **tx)
        .await?;
        inserted.push(row);
    }
    Ok(inserted)
}
