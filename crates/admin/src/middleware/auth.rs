//! Admin authentication extractor.
//!
//! Role membership is verified once at login (`routes::auth::login` checks
//! `user_roles` before writing the session); from then on the session entry
//! is the proof of access until it expires.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AdminError;
use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires a signed-in admin.
///
/// Rejects with [`AdminError::Unauthorized`] so the 401 carries the same
/// JSON error body as every other failure.
pub struct RequireAdmin(pub CurrentAdmin);

fn unauthenticated() -> AdminError {
    AdminError::Unauthorized("Admin sign in required".to_owned())
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(unauthenticated)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or_else(unauthenticated)?;

        Ok(Self(admin))
    }
}
