//! Admin authentication route handlers.
//!
//! Sign-in requires an existing account that already holds the `admin`
//! role; the admin service never creates accounts or grants roles itself
//! (that is the CLI's job).

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use clover_core::AppRole;

use crate::db::UserRepository;
use crate::error::{AdminError, Result};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// POST /auth/login
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let email = body.email.trim().to_lowercase();

    let repo = UserRepository::new(state.pool());
    let Some((user_id, email)) = repo.find_by_email(&email).await? else {
        // Same response as a missing role: no account enumeration.
        return Err(AdminError::Forbidden("Admin access required".to_owned()));
    };

    let roles = repo.roles(user_id).await?;
    if !roles.contains(&AppRole::Admin) {
        tracing::warn!(%user_id, "Sign-in attempt without admin role");
        return Err(AdminError::Forbidden("Admin access required".to_owned()));
    }

    let admin = CurrentAdmin { id: user_id, email };

    session
        .cycle_id()
        .await
        .map_err(|e| AdminError::Internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(session_keys::CURRENT_ADMIN, &admin)
        .await
        .map_err(|e| AdminError::Internal(format!("Failed to write session: {e}")))?;

    tracing::info!(user_id = %admin.id, "Admin signed in");
    Ok(Json(admin))
}

/// POST /auth/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    session
        .flush()
        .await
        .map_err(|e| AdminError::Internal(format!("Failed to clear session: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}
