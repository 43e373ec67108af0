//! Studio database operations
//!
//! Studios are curated. The import pipeline only looks them up; creation goes
//! through the studio API.

use catalog_common::db::Studio;
use catalog_common::time::parse_db_timestamp;
use catalog_common::{Error, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn studio_from_row(row: &SqliteRow) -> Studio {
    let created_at: String = row.get("created_at");
    Studio {
        id: row.get("id"),
        name: row.get("name"),
        created_at: parse_db_timestamp(&created_at).unwrap_or_else(Utc::now),
    }
}

/// Case-insensitive lookup by name (never creates)
pub async fn find_studio_id(pool: &SqlitePool, name: &str) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM studios WHERE name = ?")
        .bind(name.trim())
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

/// Create a curated studio; a case-insensitive duplicate is rejected
pub async fn create_studio(pool: &SqlitePool, name: &str) -> Result<Studio> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Studio name must not be empty".to_string()));
    }

    let result = sqlx::query("INSERT INTO studios (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::InvalidInput(format!("Studio already exists: {}", name)));
    }

    load_studio(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| Error::Internal(format!("Studio vanished after insert: {}", name)))
}

pub async fn load_studio(pool: &SqlitePool, id: i64) -> Result<Option<Studio>> {
    let row = sqlx::query("SELECT id, name, created_at FROM studios WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(studio_from_row))
}

/// All studios ordered by name
pub async fn list_studios(pool: &SqlitePool) -> Result<Vec<Studio>> {
    let rows = sqlx::query("SELECT id, name, created_at FROM studios ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(studio_from_row).collect())
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
    async fn test_create_and_find_case_insensitive() {
        let pool = setup_test_db().await;
        let studio = create_studio(&pool, " MetArt ").await.unwrap();
        assert_eq!(studio.name, "MetArt");

        assert_eq!(find_studio_id(&pool, "metart").await.unwrap(), Some(studio.id));
        assert_eq!(find_studio_id(&pool, "X-Art").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_studio_rejected() {
        let pool = setup_test_db().await;
        create_studio(&pool, "MetArt").await.unwrap();
        let err = create_studio(&pool, "METART").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_blank_studio_rejected() {
        let pool = setup_test_db().await;
        assert!(create_studio(&pool, "   ").await.is_err());
    }

    #[tokio::test]
    async fn test_list_sorted() {
        let pool = setup_test_db().await;
        create_studio(&pool, "X-Art").await.unwrap();
        create_studio(&pool, "MetArt").await.unwrap();

        let names: Vec<String> = list_studios(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["MetArt", "X-Art"]);
    }
}
