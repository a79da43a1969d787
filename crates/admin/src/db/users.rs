//! User lookups for admin sign-in.

use sqlx::PgPool;

use clover_core::{AppRole, UserId};

use super::RepositoryError;

/// Repository for user/role reads. The admin service never creates users;
/// accounts come from the storefront and roles from the CLI grant command.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(UserId, String)>, RepositoryError> {
        let row = sqlx::query_as("SELECT id, email FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
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
        Ok(rows.into_iter().map(|(role,)| role).collect())
    }
}
