//! Product repository: catalog queries and lookups.
//!
//! Translates a [`ProductFilter`] into SQL and returns products with their
//! resolved category and position-ordered images attached. The full result
//! set is returned - no pagination (a known scalability ceiling of the
//! catalog, kept as-is).

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};

use clover_core::catalog::{CategoryRef, ProductFilter, SortKey};
use clover_core::{CategoryId, ProductId};

use super::{CategoryRepository, RepositoryError};
use crate::models::{Category, Product, ProductImage, ProductWithRelations};

const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, compare_at_price, category_id, \
                               stock_quantity, is_featured, is_active, created_at, updated_at";

/// Repository for product reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run a catalog query.
    ///
    /// A `CategoryRef::Slug` constraint is resolved to an ID first; a slug
    /// that resolves to nothing simply does not constrain the query,
    /// matching how the source ignored unknown slugs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn search(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithRelations>, RepositoryError> {
        let category_id = match &filter.category {
            Some(CategoryRef::Id(id)) => Some(*id),
            Some(CategoryRef::Slug(slug)) => {
                CategoryRepository::new(self.pool).id_by_slug(slug).await?
            }
            None => None,
        };

        let mut qb = build_search_query(filter, category_id);
        let products: Vec<Product> = qb.build_query_as().fetch_all(self.pool).await?;
        self.attach_relations(products).await
    }

    /// Fetch one product by slug, with relations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_slug(
        &self,
        slug: &str,
        include_inactive: bool,
    ) -> Result<Option<ProductWithRelations>, RepositoryError> {
        let product: Option<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1 AND (is_active OR $2)"
        ))
        .bind(slug)
        .bind(include_inactive)
        .fetch_optional(self.pool)
        .await?;

        match product {
            Some(p) => Ok(self.attach_relations(vec![p]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Lightweight product summaries for a set of IDs (anonymous cart
    /// rendering). Missing IDs are silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summaries(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, ProductSummary>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
        let rows: Vec<ProductSummary> = sqlx::query_as(
            "SELECT p.id, p.name, p.slug, p.price, \
             (SELECT url FROM product_images pi \
              WHERE pi.product_id = p.id ORDER BY pi.position LIMIT 1) AS image_url \
             FROM products p WHERE p.id = ANY($1)",
        )
        .bind(&uuids)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|s| (s.id, s)).collect())
    }

    /// Attach categories and ordered images to a product set.
    async fn attach_relations(
        &self,
        products: Vec<Product>,
    ) -> Result<Vec<ProductWithRelations>, RepositoryError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<uuid::Uuid> = products.iter().map(|p| p.id.as_uuid()).collect();
        let category_ids: Vec<uuid::Uuid> = products
            .iter()
            .filter_map(|p| p.category_id.map(|c| c.as_uuid()))
            .collect();

        let images: Vec<ProductImage> = sqlx::query_as(
            "SELECT id, product_id, url, alt_text, position, created_at \
             FROM product_images WHERE product_id = ANY($1) \
             ORDER BY product_id, position",
        )
        .bind(&product_ids)
        .fetch_all(self.pool)
        .await?;

        let categories: Vec<Category> = if category_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as(
                "SELECT id, name, slug, description, image_url, parent_id, created_at \
                 FROM categories WHERE id = ANY($1)",
            )
            .bind(&category_ids)
            .fetch_all(self.pool)
            .await?
        };

        let mut images_by_product: HashMap<ProductId, Vec<ProductImage>> = HashMap::new();
        for image in images {
            images_by_product
                .entry(image.product_id)
                .or_default()
                .push(image);
        }
        let categories_by_id: HashMap<CategoryId, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let category = product
                    .category_id
                    .and_then(|id| categories_by_id.get(&id).cloned());
                let images = images_by_product.remove(&product.id).unwrap_or_default();
                ProductWithRelations {
                    product,
                    category,
                    images,
                }
            })
            .collect())
    }
}

/// Product summary used when rendering the anonymous cart.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Translate a filter (with its category already resolved to an ID, or
/// `None` for unconstrained) into the catalog SELECT.
fn build_search_query(
    filter: &ProductFilter,
    category_id: Option<CategoryId>,
) -> QueryBuilder<'static, sqlx::Postgres> {
    let mut qb: QueryBuilder<'static, sqlx::Postgres> =
        QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"));

    if !filter.include_inactive {
        qb.push(" AND is_active = TRUE");
    }
    if let Some(term) = &filter.search {
        qb.push(" AND name ILIKE ");
        qb.push_bind(format!("%{}%", escape_like(term)));
    }
    if let Some(id) = category_id {
        qb.push(" AND category_id = ");
        qb.push_bind(id);
    }
    if filter.featured_only {
        qb.push(" AND is_featured = TRUE");
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND price >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND price <= ");
        qb.push_bind(max);
    }

    qb.push(match filter.sort {
        SortKey::Newest => " ORDER BY created_at DESC",
        SortKey::PriceAsc => " ORDER BY price ASC",
        SortKey::PriceDesc => " ORDER BY price DESC",
        SortKey::NameAsc => " ORDER BY name ASC",
    });

    qb
}

/// Escape `LIKE` metacharacters in a user-supplied search term so the term
/// matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("100%_cotton"), "100\\%\\_cotton");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn plain_terms_pass_through() {
        assert_eq!(escape_like("shirt"), "shirt");
    }

    #[test]
    fn category_constraint_reaches_the_sql() {
        let id = CategoryId::generate();
        let filter = ProductFilter::all_active().category(CategoryRef::Id(id));
        let sql = build_search_query(&filter, Some(id)).into_sql();
        assert!(sql.contains("category_id = "));
    }

    #[test]
    fn unresolved_category_leaves_the_listing_unconstrained() {
        let filter =
            ProductFilter::all_active().category(CategoryRef::Slug("no-such-category".into()));
        let sql = build_search_query(&filter, None).into_sql();
        assert!(!sql.contains("category_id"));
    }

    #[test]
    fn customer_queries_exclude_inactive_products() {
        let active_only = build_search_query(&ProductFilter::all_active(), None).into_sql();
        assert!(active_only.contains("is_active = TRUE"));

        let with_inactive =
            build_search_query(&ProductFilter::all_active().include_inactive(), None).into_sql();
        assert!(!with_inactive.contains("is_active = TRUE"));
    }
}
