//! catalog-ingest library interface
//!
//! Folder-name inference and guided import: parser, review session, import
//! executor and the HTTP API that exposes them.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod parser;
pub mod review;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use catalog_common::events::EventBus;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::config::IngestConfig;
use crate::import::{CatalogStore, FolderStore, ImportExecutor, LocalFolderStore, SqliteCatalog};
use crate::parser::FolderNameParser;
use crate::review::ReviewSession;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog database pool
    pub db: SqlitePool,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Parser configured from `[heuristics]` and `[tiers]`
    pub parser: FolderNameParser,
    pub executor: ImportExecutor,
    /// The open review session, if any
    pub review: Arc<RwLock<Option<ReviewSession>>>,
    /// Held while an import runs
    pub import_lock: Arc<Mutex<()>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Production wiring: SQLite catalog and local filesystem
    pub fn new(db: SqlitePool, event_bus: EventBus, config: &IngestConfig) -> Self {
        let catalog = Arc::new(SqliteCatalog::new(db.clone()));
        Self::with_stores(db, event_bus, config, catalog, Arc::new(LocalFolderStore::new()))
    }

    /// Wiring with explicit stores
    pub fn with_stores(
        db: SqlitePool,
        event_bus: EventBus,
        config: &IngestConfig,
        catalog: Arc<dyn CatalogStore>,
        folders: Arc<dyn FolderStore>,
    ) -> Self {
        let parser = FolderNameParser::new(config.heuristics, config.tiers);
        let executor = ImportExecutor::new(catalog, folders, config.executor.clone())
            .with_parser(parser)
            .with_event_bus(event_bus.clone());

        Self {
            db,
            event_bus,
            parser,
            executor,
            review: Arc::new(RwLock::new(None)),
            import_lock: Arc::new(Mutex::new(())),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::parse_routes())
        .merge(api::review_routes())
        .merge(api::import_routes())
        .merge(api::studio_routes())
        .route("/events", get(api::event_stream))
        .route("/import/events", get(api::import_event_stream))
        .merge(api::health_routes())
        .with_state(state)
}
