//! Catalog management route handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clover_core::ProductId;

use crate::db::ProductRepository;
use crate::db::products::{ImageInput, ProductInput};
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::models::ProductWithImages;
use crate::state::AppState;

/// Create/update payload: the product fields plus the full image list. The
/// stored image set is replaced with exactly this list on every edit.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(flatten)]
    pub product: ProductInput,
    #[serde(default)]
    pub images: Vec<ImageInput>,
}

/// GET /products
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<ProductWithImages>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// GET /products/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductWithImages>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// POST /products
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductWithImages>)> {
    validate(&body.product)?;
    let product = ProductRepository::new(state.pool())
        .create(&body.product, &body.images)
        .await?;
    tracing::info!(product_id = %product.product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id}
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductWithImages>> {
    validate(&body.product)?;
    let product = ProductRepository::new(state.pool())
        .update(id, &body.product, &body.images)
        .await?;
    Ok(Json(product))
}

/// DELETE /products/{id}
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool()).delete(id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Response for an upload batch: public URLs in submission order.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}

/// POST /products/{id}/images
///
/// Accepts a multipart batch of image files and stores them; the returned
/// URLs are meant to be submitted back in the product's image list. The
/// product must exist, but the upload itself does not touch the
/// `product_images` table.
#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
pub async fn upload_images(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("product {id}")))?;

    let mut urls = Vec::new();
    let mut index = 0;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::Upload(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AdminError::Upload(e.to_string()))?;

        let stored = state
            .media()
            .store(id, index, &file_name, &bytes)
            .await
            .map_err(|e| AdminError::Upload(e.to_string()))?;
        urls.push(stored.url);
        index += 1;
    }

    if urls.is_empty() {
        return Err(AdminError::BadRequest("No image files in upload".to_owned()));
    }
    Ok(Json(UploadResponse { urls }))
}

/// Field checks shared by create and update.
fn validate(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AdminError::BadRequest("Product name is required".to_owned()));
    }
    if input.price < rust_decimal::Decimal::ZERO {
        return Err(AdminError::BadRequest(
            "Price must not be negative".to_owned(),
        ));
    }
    if input.stock_quantity < 0 {
        return Err(AdminError::BadRequest(
            "Stock quantity must not be negative".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn input(name: &str, price: rust_decimal::Decimal, stock: i32) -> ProductInput {
        ProductInput {
            name: name.to_owned(),
            description: None,
            price,
            compare_at_price: None,
            category_id: None,
            stock_quantity: stock,
            is_featured: false,
            is_active: true,
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate(&input("   ", dec!(10.00), 0)).is_err());
    }

    #[test]
    fn negative_price_and_stock_are_rejected() {
        assert!(validate(&input("Mug", dec!(-1.00), 0)).is_err());
        assert!(validate(&input("Mug", dec!(1.00), -5)).is_err());
    }

    #[test]
    fn sane_input_passes() {
        assert!(validate(&input("Mug", dec!(12.50), 3)).is_ok());
    }
}
