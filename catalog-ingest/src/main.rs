//! catalog-ingest - Folder Import Service
//!
//! **Module Identity:**
//! - Name: catalog-ingest
//! - Default port: 5810
//!
//! Infers studio/model metadata from album folder names, runs the guided
//! review session and moves confirmed folders into catalog storage.

use anyhow::{Context, Result};
use catalog_common::config::RootFolderInitializer;
use catalog_common::events::EventBus;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_ingest::config::{CliOverrides, IngestConfig, MODULE_NAME};
use catalog_ingest::import::{LocalFolderStore, SqliteCatalog};
use catalog_ingest::AppState;

/// Command-line arguments for catalog-ingest
#[derive(Parser, Debug)]
#[command(name = "catalog-ingest")]
#[command(about = "Folder metadata inference and guided import service")]
#[command(version)]
struct Args {
    /// Root folder holding the catalog database
    #[arg(short, long, env = "CATALOG_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Folder scanned for candidate album folders
    #[arg(short, long, env = "CATALOG_IMPORT_ROOT")]
    import_root: Option<PathBuf>,

    /// Permanent album storage
    #[arg(short, long, env = "CATALOG_STORAGE_ROOT")]
    storage_root: Option<PathBuf>,

    /// HTTP server port
    #[arg(short, long, env = "CATALOG_INGEST_PORT")]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "CATALOG_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            root_folder: args.root_folder,
            import_root: args.import_root,
            storage_root: args.storage_root,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = IngestConfig::resolve(args.into());

    init_tracing(&config.log_level, config.log_file.as_deref());

    info!(
        "Starting {} v{} [{}] built {} ({})",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Root folder: {}", config.root_folder.display());
    info!("Import root: {}", config.executor.import_root.display());
    info!("Storage root: {}", config.executor.storage_root.display());

    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = catalog_common::db::init_database(&db_path)
        .await
        .context("Failed to open catalog database")?;

    let event_bus = EventBus::new(100);

    let catalog = SqliteCatalog::from_settings(db_pool.clone())
        .await
        .context("Failed to read catalog settings")?;
    info!("Database lock wait: {} ms", catalog.max_lock_wait_ms());

    let state = AppState::with_stores(
        db_pool,
        event_bus,
        &config,
        Arc::new(catalog),
        Arc::new(LocalFolderStore::new()),
    );
    let app = catalog_ingest::build_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("{} stopped", MODULE_NAME);
    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(level: &str, log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("catalog_ingest={level},catalog_common={level}").into()
    });

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            Err(e) => {
                open_error = Some(format!("{}: {}", path.display(), e));
                None
            }
        }
    });
    let stdout_layer = file_layer.is_none().then(fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Some(e) = open_error {
        warn!("Log file unavailable, logging to stdout ({})", e);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
