//! Album database operations

use catalog_common::db::Album;
use catalog_common::time::parse_db_timestamp;
use catalog_common::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Fields for a new album row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlbum {
    /// Verbatim source folder name
    pub title: String,
    pub studio_id: i64,
    pub model_id: Option<i64>,
    /// Unique per import attempt
    pub source_url: String,
}

fn album_from_row(row: &SqliteRow) -> Album {
    let created_at: String = row.get("created_at");
    Album {
        id: row.get("id"),
        title: row.get("title"),
        studio_id: row.get("studio_id"),
        model_id: row.get("model_id"),
        source_url: row.get("source_url"),
        created_at: parse_db_timestamp(&created_at).unwrap_or_else(Utc::now),
    }
}

/// Insert an album and return its id
pub async fn insert_album(pool: &SqlitePool, album: &NewAlbum) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO albums (title, studio_id, model_id, source_url, created_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(&album.title)
    .bind(album.studio_id)
    .bind(album.model_id)
    .bind(&album.source_url)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn load_album(pool: &SqlitePool, id: i64) -> Result<Option<Album>> {
    let row = sqlx::query(
        "SELECT id, title, studio_id, model_id, source_url, created_at FROM albums WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(album_from_row))
}

/// Albums in id order
pub async fn list_albums(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        "SELECT id, title, studio_id, model_id, source_url, created_at FROM albums ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(album_from_row).collect())
}

pub async fn count_albums(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM albums")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::studios::create_studio;
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
    async fn test_insert_and_load() {
        let pool = setup_test_db().await;
        let studio = create_studio(&pool, "MetArt").await.unwrap();

        let id = insert_album(
            &pool,
            &NewAlbum {
                title: "[MetArt][Emma]Summer".to_string(),
                studio_id: studio.id,
                model_id: None,
                source_url: "local-import://1-ab".to_string(),
            },
        )
        .await
        .unwrap();

        let album = load_album(&pool, id).await.unwrap().unwrap();
        assert_eq!(album.title, "[MetArt][Emma]Summer");
        assert_eq!(album.studio_id, studio.id);
        assert_eq!(album.model_id, None);
        assert_eq!(count_albums(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let pool = setup_test_db().await;
        let studio = create_studio(&pool, "MetArt").await.unwrap();

        let mut ids = Vec::new();
        for n in 0..3 {
            ids.push(
                insert_album(
                    &pool,
                    &NewAlbum {
                        title: format!("set {}", n),
                        studio_id: studio.id,
                        model_id: None,
                        source_url: format!("local-import://{}", n),
                    },
                )
                .await
                .unwrap(),
            );
        }

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(list_albums(&pool).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_source_url_rejected() {
        let pool = setup_test_db().await;
        let studio = create_studio(&pool, "MetArt").await.unwrap();
        let album = NewAlbum {
            title: "a".to_string(),
            studio_id: studio.id,
            model_id: None,
            source_url: "local-import://same".to_string(),
        };

        insert_album(&pool, &album).await.unwrap();
        assert!(insert_album(&pool, &album).await.is_err());
    }
}
