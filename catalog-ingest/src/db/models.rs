//! Model (performer) database operations
//!
//! Unlike studios, models are created on demand during import.

use catalog_common::db::Model;
use catalog_common::time::parse_db_timestamp;
use catalog_common::{Error, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

pub async fn find_model_id(pool: &SqlitePool, name: &str) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM models WHERE name = ?")
        .bind(name.trim())
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

/// Id of the model with this name (case-insensitive), inserting it when missing
pub async fn find_or_create_model(pool: &SqlitePool, name: &str) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Model name must not be empty".to_string()));
    }

    sqlx::query("INSERT INTO models (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    find_model_id(pool, name)
        .await?
        .ok_or_else(|| Error::Internal(format!("Model missing after insert: {}", name)))
}

pub async fn load_model(pool: &SqlitePool, id: i64) -> Result<Option<Model>> {
    let row = sqlx::query("SELECT id, name, created_at FROM models WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| {
        let created_at: String = row.get("created_at");
        Model {
            id: row.get("id"),
            name: row.get("name"),
            created_at: parse_db_timestamp(&created_at).unwrap_or_else(Utc::now),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_common::db::create_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_find_or_create_reuses_existing() {
        let pool = setup_test_db().await;

        let first = find_or_create_model(&pool, "Emma").await.unwrap();
        let second = find_or_create_model(&pool, " emma ").await.unwrap();
        assert_eq!(first, second);

        let model = load_model(&pool, first).await.unwrap().unwrap();
        assert_eq!(model.name, "Emma");
    }

    #[tokio::test]
    async fn test_distinct_models_get_distinct_ids() {
        let pool = setup_test_db().await;
        let emma = find_or_create_model(&pool, "Emma").await.unwrap();
        let lily = find_or_create_model(&pool, "Lily").await.unwrap();
        assert_ne!(emma, lily);
        assert_eq!(find_model_id(&pool, "LILY").await.unwrap(), Some(lily));
    }

    #[tokio::test]
    async fn test_blank_model_rejected() {
        let pool = setup_test_db().await;
        assert!(find_or_create_model(&pool, "  ").await.is_err());
    }
}
