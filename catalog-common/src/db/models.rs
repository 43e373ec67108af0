//! Catalog database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Publisher/organization. Curated: created explicitly, never by the import pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Studio {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Performer/subject. Created on demand during import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Imported photo set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub studio_id: i64,
    pub model_id: Option<i64>,
    pub source_url: String,
    pub created_at: DateTime<Utc>,
}
