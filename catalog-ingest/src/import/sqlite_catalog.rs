//! SQLite-backed catalog store
//!
//! Writes go through [`retry_on_lock`] so concurrent items of one batch ride out
//! transient "database is locked" errors.

use super::CatalogStore;
use crate::db::{self, NewAlbum};
use crate::utils::retry_on_lock;
use catalog_common::Result;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
    max_lock_wait_ms: u64,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            max_lock_wait_ms: db::settings::DEFAULT_MAX_LOCK_WAIT_MS,
        }
    }

    /// Build with the lock-wait budget stored in the settings table
    pub async fn from_settings(pool: SqlitePool) -> Result<Self> {
        let max_lock_wait_ms = db::settings::get_max_lock_wait_ms(&pool).await?;
        Ok(Self {
            pool,
            max_lock_wait_ms,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn max_lock_wait_ms(&self) -> u64 {
        self.max_lock_wait_ms
    }
}

#[async_trait::async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_studio(&self, name: &str) -> Result<Option<i64>> {
        db::studios::find_studio_id(&self.pool, name).await
    }

    async fn find_or_create_model(&self, name: &str) -> Result<Option<i64>> {
        if name.trim().is_empty() {
            return Ok(None);
        }

        let id = retry_on_lock("model find-or-create", self.max_lock_wait_ms, || {
            db::models::find_or_create_model(&self.pool, name)
        })
        .await?;

        Ok(Some(id))
    }

    async fn create_album(&self, album: NewAlbum) -> Result<i64> {
        retry_on_lock("album insert", self.max_lock_wait_ms, || {
            db::albums::insert_album(&self.pool, &album)
        })
        .await
    }
}
