//! Catalog route handlers: product listing, product detail, categories.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clover_core::catalog::{CategoryRef, ProductFilter, SortKey};

use crate::db::{CategoryRepository, ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::models::{Category, ProductWithRelations, Review};
use crate::state::AppState;

/// Query parameters accepted by the catalog listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    /// Category slug. An unknown slug yields the unconstrained listing.
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// One of `newest`, `price-asc`, `price-desc`, `name-asc`.
    pub sort: Option<String>,
}

/// GET /products
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductWithRelations>>> {
    let sort = match query.sort.as_deref() {
        Some(raw) => raw
            .parse::<SortKey>()
            .map_err(|_| AppError::BadRequest(format!("Unknown sort key: {raw}")))?,
        None => SortKey::default(),
    };

    let mut filter = ProductFilter::default().sort(sort);
    if let Some(term) = query.search.as_deref() {
        filter = filter.search(term);
    }
    if query.featured == Some(true) {
        filter = filter.featured_only();
    }
    filter = filter.price_range(query.min_price, query.max_price);

    // Slugs resolve through the cached lookup; a slug that matches nothing
    // leaves the listing unconstrained, same as the source did.
    if let Some(slug) = query.category.as_deref() {
        if let Some(id) = state.category_id_by_slug(slug).await? {
            filter = filter.category(CategoryRef::Id(id));
        }
    }

    let products = ProductRepository::new(state.pool()).search(&filter).await?;
    Ok(Json(products))
}

/// Product detail payload: the product with relations plus its reviews.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductWithRelations,
    pub reviews: Vec<Review>,
}

/// GET /products/{slug}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug, false)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(product.product.id)
        .await?;

    Ok(Json(ProductDetail { product, reviews }))
}

/// GET /categories
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}
