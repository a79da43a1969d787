//! User, role, and profile repository.
//!
//! Authentication itself is delegated to the session layer; this repository
//! only resolves identities (find-or-create by email) and the simple owned
//! records keyed by user.

use sqlx::PgPool;

use clover_core::{AppRole, UserId};

use super::RepositoryError;
use crate::models::{Profile, User};

const USER_COLUMNS: &str = "id, email, created_at, updated_at";

/// Repository for user records.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email, creating one on first sign-in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        // The no-op DO UPDATE makes RETURNING yield the row on both paths.
        let user = sqlx::query_as(&format!(
            "INSERT INTO users (email) VALUES ($1) \
             ON CONFLICT (email) DO UPDATE SET updated_at = now() \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .fetch_one(self.pool)
        .await?;
        Ok(user)
    }

    /// Roles granted to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn roles(&self, user_id: UserId) -> Result<Vec<AppRole>, RepositoryError> {
        let rows: Vec<(AppRole,)> =
            sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(self.pool)
                .await?;
        Ok(rows.into_iter().map(|(r,)| r).collect())
    }

    /// The user's profile, if one has been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as(
            "SELECT user_id, full_name, phone, avatar_url, updated_at \
             FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Create or update the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn upsert_profile(
        &self,
        user_id: UserId,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Profile, RepositoryError> {
        let row = sqlx::query_as(
            "INSERT INTO profiles (user_id, full_name, phone) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) \
             DO UPDATE SET full_name = EXCLUDED.full_name, \
                           phone = EXCLUDED.phone, \
                           updated_at = now() \
             RETURNING user_id, full_name, phone, avatar_url, updated_at",
        )
        .bind(user_id)
        .bind(full_name)
        .bind(phone)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }
}
