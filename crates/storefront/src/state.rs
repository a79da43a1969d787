//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use clover_core::CategoryId;

use crate::config::StorefrontConfig;
use crate::db::{CategoryRepository, RepositoryError};

/// How long a category slug resolution stays cached. Categories change
/// rarely and only through the admin service.
const CATEGORY_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; created once at session start in `main` and
/// torn down with the process. Replaces the ambient shared cart/auth context
/// of the original with an explicitly passed object.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    /// slug -> category id; `None` caches a miss so unknown slugs do not
    /// hit the database on every request.
    category_ids: Cache<String, Option<CategoryId>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let category_ids = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(CATEGORY_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                category_ids,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Resolve a category slug to its ID through the cache.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the uncached lookup fails. Lookup
    /// failures are not cached.
    pub async fn category_id_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CategoryId>, RepositoryError> {
        if let Some(cached) = self.inner.category_ids.get(slug).await {
            return Ok(cached);
        }
        let id = CategoryRepository::new(self.pool()).id_by_slug(slug).await?;
        self.inner.category_ids.insert(slug.to_owned(), id).await;
        Ok(id)
    }
}
