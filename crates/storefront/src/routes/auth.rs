//! Authentication route handlers.
//!
//! Identity verification itself is delegated to the upstream provider; by
//! the time a login request reaches this service the email is trusted.
//! Login is the one moment the anonymous cart migrates into the persisted
//! one, so the merge runs here before the response is sent.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::OptionalAuth;
use crate::models::session::{CurrentUser, keys};
use crate::services::CartService;
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
) -> Result<Json<CurrentUser>> {
    let email = body.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_owned()));
    }

    let user = UserRepository::new(state.pool())
        .get_or_create_by_email(&email)
        .await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email,
    };

    // Cycle the session ID on privilege change, then persist the identity.
    session.cycle_id().await.map_err(|e| {
        AppError::Internal(format!("Failed to rotate session: {e}"))
    })?;
    session
        .insert(keys::CURRENT_USER, &current)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write session: {e}")))?;

    // Migrate the anonymous cart now that identity is present.
    CartService::new(state.pool(), state.config().cart_merge)
        .merge_local_into_user(&session, &current)
        .await?;

    set_sentry_user(&current.id, Some(&current.email));
    tracing::info!(user_id = %current.id, "User signed in");

    Ok(Json(current))
}

/// POST /auth/logout
///
/// Destroys the whole session, including any leftover anonymous cart, so a
/// following visitor on the same device starts clean.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to clear session: {e}")))?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<Option<CurrentUser>> {
    Json(user)
}
