//! Persisted cart repository.
//!
//! `cart_items` is unique on `(user_id, product_id)`: adds are upserts on
//! that key, so a cart can never hold two rows for the same product.

use rust_decimal::Decimal;
use sqlx::PgPool;

use clover_core::cart::MergeStrategy;
use clover_core::{ProductId, UserId};

use super::RepositoryError;

/// One persisted cart row joined with its product, if the product still
/// resolves. A `None` product contributes zero to the subtotal rather than
/// erroring.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersistedCartLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub product_name: Option<String>,
    pub product_slug: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
}

/// Repository for the authenticated (server-persisted) cart.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All cart lines for a user with product data attached, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn fetch(&self, user_id: UserId) -> Result<Vec<PersistedCartLine>, RepositoryError> {
        let rows: Vec<PersistedCartLine> = sqlx::query_as(
            "SELECT ci.product_id, ci.quantity, \
                    p.name AS product_name, p.slug AS product_slug, p.price, \
                    (SELECT url FROM product_images pi \
                     WHERE pi.product_id = p.id ORDER BY pi.position LIMIT 1) AS image_url \
             FROM cart_items ci \
             LEFT JOIN products p ON p.id = ci.product_id \
             WHERE ci.user_id = $1 \
             ORDER BY ci.created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        validate_lines(&rows)?;
        Ok(rows)
    }

    /// Add `quantity` of a product, incrementing any existing row for the
    /// `(user, product)` pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Set the absolute quantity for a product. Zero (or negative) removes
    /// the row, matching `remove_item` exactly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        if quantity == 0 {
            return self.remove_item(user_id, product_id).await;
        }
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, product_id) \
             DO UPDATE SET quantity = EXCLUDED.quantity",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Remove the row for a product, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Empty the user's cart (post-checkout, or explicit clear).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Upsert one line during merge-on-login. The conflict action depends
    /// on the configured [`MergeStrategy`]: `Replace` overwrites the
    /// persisted quantity with the local one (the source behavior), `Add`
    /// sums them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn upsert_merged(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
        strategy: MergeStrategy,
    ) -> Result<(), RepositoryError> {
        sqlx::query(merge_upsert_sql(strategy))
            .bind(user_id)
            .bind(product_id)
            .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

/// SQL for one merge upsert. The conflict action is the SQL rendering of
/// [`MergeStrategy::merged_quantity`]: `Replace` keeps the incoming value,
/// `Add` sums existing and incoming. Keep the two in lockstep.
const fn merge_upsert_sql(strategy: MergeStrategy) -> &'static str {
    match strategy {
        MergeStrategy::Replace => {
            "INSERT INTO cart_items (user_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, product_id) \
             DO UPDATE SET quantity = EXCLUDED.quantity"
        }
        MergeStrategy::Add => {
            "INSERT INTO cart_items (user_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity"
        }
    }
}

/// `cart_items.quantity` is a signed column; anything negative can only be
/// the result of writes outside this repository and is rejected here rather
/// than silently rendered as zero.
fn validate_lines(rows: &[PersistedCartLine]) -> Result<(), RepositoryError> {
    for row in rows {
        if row.quantity < 0 {
            return Err(RepositoryError::DataCorruption(format!(
                "cart line for product {} has negative quantity {}",
                row.product_id, row.quantity
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32) -> PersistedCartLine {
        PersistedCartLine {
            product_id: ProductId::generate(),
            quantity,
            product_name: None,
            product_slug: None,
            price: None,
            image_url: None,
        }
    }

    #[test]
    fn negative_quantities_are_rejected_as_corrupt() {
        let err = validate_lines(&[line(2), line(-1)]).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn non_negative_quantities_pass() {
        assert!(validate_lines(&[line(0), line(3)]).is_ok());
    }

    #[test]
    fn merge_upsert_sql_mirrors_merged_quantity() {
        // Replace keeps the incoming quantity, exactly like
        // MergeStrategy::Replace.merged_quantity(existing, incoming).
        assert!(
            merge_upsert_sql(MergeStrategy::Replace)
                .ends_with("DO UPDATE SET quantity = EXCLUDED.quantity")
        );
        // Add sums the two, exactly like MergeStrategy::Add.
        assert!(
            merge_upsert_sql(MergeStrategy::Add)
                .ends_with("DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity")
        );
    }
}
