//! Settings database operations
//!
//! Key-value accessors over the shared `settings` table.

use catalog_common::db::SETTING_MAX_LOCK_WAIT_MS;
use catalog_common::{Error, Result};
use sqlx::{Pool, Sqlite};

/// Default for [`SETTING_MAX_LOCK_WAIT_MS`] when the row is missing
pub const DEFAULT_MAX_LOCK_WAIT_MS: u64 = 5000;

/// Maximum total time (ms) to keep retrying a locked write
pub async fn get_max_lock_wait_ms(db: &Pool<Sqlite>) -> Result<u64> {
    get_setting(db, SETTING_MAX_LOCK_WAIT_MS)
        .await
        .map(|opt| opt.unwrap_or(DEFAULT_MAX_LOCK_WAIT_MS))
}

pub async fn set_max_lock_wait_ms(db: &Pool<Sqlite>, value: u64) -> Result<()> {
    set_setting(db, SETTING_MAX_LOCK_WAIT_MS, value).await
}

/// Generic setting getter (internal)
async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((Some(value),)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting '{}' failed: {}", key, e)))?;
            Ok(Some(parsed))
        }
        _ => Ok(None),
    }
}

/// Generic setting setter (internal)
async fn set_setting<T>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_common::db::create_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_default_lock_wait_from_schema() {
        let pool = setup_test_db().await;
        assert_eq!(get_max_lock_wait_ms(&pool).await.unwrap(), 5000);
    }

    #[tokio::test]
    async fn test_set_then_get_lock_wait() {
        let pool = setup_test_db().await;
        set_max_lock_wait_ms(&pool, 250).await.unwrap();
        assert_eq!(get_max_lock_wait_ms(&pool).await.unwrap(), 250);
    }

    #[tokio::test]
    async fn test_missing_row_uses_default() {
        let pool = setup_test_db().await;
        sqlx::query("DELETE FROM settings").execute(&pool).await.unwrap();
        assert_eq!(get_max_lock_wait_ms(&pool).await.unwrap(), DEFAULT_MAX_LOCK_WAIT_MS);
    }

    #[tokio::test]
    async fn test_unparsable_value_is_config_error() {
        let pool = setup_test_db().await;
        sqlx::query("UPDATE settings SET value = 'soon' WHERE key = ?")
            .bind(SETTING_MAX_LOCK_WAIT_MS)
            .execute(&pool)
            .await
            .unwrap();

        let err = get_max_lock_wait_ms(&pool).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
