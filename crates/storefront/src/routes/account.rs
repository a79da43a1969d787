//! Account route handlers: profile and saved addresses.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use clover_core::AddressId;

use crate::db::{AddressRepository, UserRepository, addresses::AddressInput};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Address, Profile};
use crate::state::AppState;

/// GET /account/profile
///
/// A user who has never saved a profile gets an empty one rather than a
/// 404, so the account page always has something to render.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ProfileResponse>> {
    let profile = UserRepository::new(state.pool())
        .get_profile(user.id)
        .await?;
    Ok(Json(ProfileResponse {
        email: user.email,
        profile,
    }))
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// PUT /account/profile
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let profile = UserRepository::new(state.pool())
        .upsert_profile(user.id, body.full_name.as_deref(), body.phone.as_deref())
        .await?;
    Ok(Json(profile))
}

/// GET /account/addresses
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(addresses))
}

/// POST /account/addresses
///
/// Creating a default address demotes any previous default.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddressInput>,
) -> Result<(StatusCode, Json<Address>)> {
    let address = AddressRepository::new(state.pool())
        .create(user.id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// DELETE /account/addresses/{id}
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(address_id): Path<AddressId>,
) -> Result<StatusCode> {
    AddressRepository::new(state.pool())
        .delete(user.id, address_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
