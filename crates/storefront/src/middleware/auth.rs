//! Authentication extractors.
//!
//! Identity resolution is delegated to the session layer: a request either
//! carries a [`CurrentUser`] in its session or it is anonymous. Absence of
//! identity is never an error for cart reads - callers that can serve
//! anonymous traffic use [`OptionalAuth`] and fall back to the local cart.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session::{CurrentUser, keys};

/// Extractor that requires a signed-in user.
///
/// Rejects with [`AppError::Unauthorized`] so the 401 carries the same JSON
/// error body as every other failure.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

fn unauthenticated() -> AppError {
    AppError::Unauthorized("Sign in required".to_owned())
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(unauthenticated)?;

        let user: CurrentUser = session
            .get(keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(unauthenticated)?;

        Ok(Self(user))
    }
}

/// Extractor that optionally resolves the current user.
///
/// Unlike [`RequireAuth`], never rejects - an absent identity yields `None`
/// and the handler serves the anonymous path.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}
