//! Address book repository.

use serde::Deserialize;
use sqlx::PgPool;

use clover_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::Address;

const ADDRESS_COLUMNS: &str =
    "id, user_id, label, street_address, city, state, postal_code, country, is_default, created_at";

/// New or updated address payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    pub label: String,
    pub street_address: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Repository for the user's saved addresses.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All addresses for a user, default first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses \
             WHERE user_id = $1 ORDER BY is_default DESC, created_at"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Save a new address. Marking it default clears the flag on the rest
    /// of the book - at most one default per user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &AddressInput,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if input.is_default {
            sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let row = sqlx::query_as(&format!(
            "INSERT INTO addresses \
             (user_id, label, street_address, city, state, postal_code, country, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&input.label)
        .bind(&input.street_address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(input.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Delete an address, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to someone else.
    pub async fn delete(&self, user_id: UserId, address_id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(address_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
