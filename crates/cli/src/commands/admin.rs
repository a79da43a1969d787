//! Admin role management commands.
//!
//! The admin service itself never grants roles; membership changes go
//! through here so they leave an operator trail.

use tracing::info;

use clover_core::AppRole;

use super::{CommandError, connect};

/// Grant the admin role to an account, creating the account if needed.
///
/// # Errors
///
/// Returns `CommandError::InvalidEmail` for a malformed email, database
/// errors otherwise.
pub async fn grant(email: &str) -> Result<(), CommandError> {
    let email = normalize(email)?;
    let pool = connect().await?;

    let (user_id,): (uuid::Uuid,) = sqlx::query_as(
        "INSERT INTO users (email) VALUES ($1) \
         ON CONFLICT (email) DO UPDATE SET updated_at = now() \
         RETURNING id",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await?;

    sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user_id)
        .bind(AppRole::Admin)
        .execute(&pool)
        .await?;

    info!(%email, %user_id, "Granted admin role");
    Ok(())
}

/// Revoke the admin role from an account.
///
/// # Errors
///
/// Returns `CommandError::UnknownAccount` if no account has this email.
pub async fn revoke(email: &str) -> Result<(), CommandError> {
    let email = normalize(email)?;
    let pool = connect().await?;

    let user: Option<(uuid::Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;
    let Some((user_id,)) = user else {
        return Err(CommandError::UnknownAccount(email));
    };

    sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role = $2")
        .bind(user_id)
        .bind(AppRole::Admin)
        .execute(&pool)
        .await?;

    info!(%email, %user_id, "Revoked admin role");
    Ok(())
}

fn normalize(email: &str) -> Result<String, CommandError> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(CommandError::InvalidEmail(email));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(
            normalize("  Admin@Example.COM ").expect("valid"),
            "admin@example.com"
        );
    }

    #[test]
    fn missing_at_sign_is_rejected() {
        assert!(normalize("not-an-email").is_err());
    }
}
