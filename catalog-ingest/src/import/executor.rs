//! Import executor
//!
//! Items run in fixed-size batches: every item of a batch runs concurrently,
//! batches run one after another. Per item, in order:
//!
//! 1. resolve or create the model (blank → no model)
//! 2. resolve the studio; missing → failed "studio not found" (never created)
//! 3. insert the album (title = verbatim folder name, placeholder source URL)
//! 4. move `<import_root>/<folder>` to `<storage_root>/<album_id>`, replacing
//!    anything already there, then check the destination exists
//!
//! Folder names must be a single plain path component; anything that could
//! resolve outside the import root is skipped before the catalog is touched.
//!
//! A failed move reports "folder move failed" and keeps the album row, so the
//! move can be retried against the same album id. The remove-then-move on the
//! destination is not locked: album ids come from the database before the move
//! and are never reused.

use super::{CatalogStore, FolderStore};
use crate::config::ExecutorConfig;
use crate::db::NewAlbum;
use crate::models::{ImportItem, ImportOutcome, ImportStatus, ImportSummary};
use crate::parser::FolderNameParser;
use catalog_common::events::{CatalogEvent, EventBus};
use catalog_common::time::{now, now_millis};
use catalog_common::Result;
use futures::future::join_all;
use std::path::{Component, Path};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const REASON_STUDIO_NOT_FOUND: &str = "studio not found";
pub const REASON_STUDIO_MISSING: &str = "studio not specified";
pub const REASON_MOVE_FAILED: &str = "folder move failed";
pub const REASON_EMPTY_FOLDER: &str = "empty folder name";
pub const REASON_INVALID_FOLDER: &str = "folder name is not a plain directory name";

/// True when `name` is exactly one normal path component (no separators, `..` or root)
pub fn is_plain_folder_name(name: &str) -> bool {
    if name.contains(|c: char| c == '/' || c == '\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Unique synthetic source URL for a locally-sourced album
pub fn placeholder_source_url() -> String {
    format!("local-import://{}-{:08x}", now_millis(), rand::random::<u32>())
}

#[derive(Clone)]
pub struct ImportExecutor {
    catalog: Arc<dyn CatalogStore>,
    folders: Arc<dyn FolderStore>,
    config: ExecutorConfig,
    parser: FolderNameParser,
    event_bus: Option<EventBus>,
}

impl ImportExecutor {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        folders: Arc<dyn FolderStore>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            catalog,
            folders,
            config,
            parser: FolderNameParser::default(),
            event_bus: None,
        }
    }

    /// Publish progress events on this bus
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Parser used to classify listed folders in [`Self::import_all_pending_albums`]
    pub fn with_parser(mut self, parser: FolderNameParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Folder names currently under the import root
    pub async fn list_pending_folders(&self) -> Result<Vec<String>> {
        self.folders
            .list_candidate_folders(&self.config.import_root)
            .await
    }

    fn emit(&self, event: CatalogEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit_lossy(event);
        }
    }

    /// Import `items` in order; outcomes follow input order
    pub async fn import_batch(&self, items: Vec<ImportItem>) -> ImportSummary {
        let run_id = Uuid::new_v4();
        let total = items.len();
        let batch_size = self.config.batch_size.max(1);

        info!(%run_id, total, batch_size, "Import run started");
        self.emit(CatalogEvent::ImportStarted {
            run_id,
            total,
            timestamp: now(),
        });

        let mut details: Vec<ImportOutcome> = Vec::with_capacity(total);

        for (index, batch) in items.chunks(batch_size).enumerate() {
            let outcomes = join_all(batch.iter().map(|item| self.import_one(item))).await;
            details.extend(outcomes);

            let imported = details.iter().filter(|d| d.status == ImportStatus::Success).count();
            let failed = details.iter().filter(|d| d.status == ImportStatus::Failed).count();

            debug!(
                %run_id,
                batch = index + 1,
                processed = details.len(),
                total,
                "Import batch completed"
            );
            self.emit(CatalogEvent::ImportBatchCompleted {
                run_id,
                batch_index: index + 1,
                processed: details.len(),
                total,
                imported,
                failed,
                timestamp: now(),
            });
        }

        let summary = ImportSummary::from_outcomes(details);

        info!(
            %run_id,
            total = summary.total,
            imported = summary.imported,
            skipped = summary.skipped,
            failed = summary.failed,
            "Import run completed"
        );
        self.emit(CatalogEvent::ImportCompleted {
            run_id,
            total: summary.total,
            imported: summary.imported,
            skipped: summary.skipped,
            failed: summary.failed,
            timestamp: now(),
        });

        summary
    }

    /// Import operator-selected items
    pub async fn import_selected_albums(&self, items: Vec<ImportItem>) -> ImportSummary {
        self.import_batch(items).await
    }

    /// Import every folder under the import root that is in the exact
    /// `[Studio][Model]Title` form; other names are reported as skipped
    pub async fn import_all_pending_albums(&self) -> ImportSummary {
        let names = match self.list_pending_folders().await {
            Ok(names) => names,
            Err(e) => {
                error!(
                    import_root = %self.config.import_root.display(),
                    error = %e,
                    "Listing import candidates failed"
                );
                self.emit(CatalogEvent::ImportAborted {
                    run_id: Uuid::new_v4(),
                    error_message: e.to_string(),
                    timestamp: now(),
                });
                return ImportSummary::aborted();
            }
        };

        let mut slots: Vec<Option<ImportOutcome>> = vec![None; names.len()];
        let mut positions = Vec::new();
        let mut items = Vec::new();

        for (position, name) in names.iter().enumerate() {
            let candidate = self.parser.parse_folder_name(name);
            if candidate.valid {
                positions.push(position);
                items.push(ImportItem {
                    folder_name: name.clone(),
                    studio: candidate.studio,
                    model: candidate.model,
                    title: candidate.title,
                });
            } else {
                let reason = candidate
                    .error
                    .unwrap_or_else(|| "unrecognised folder name".to_string());
                debug!(folder = %name, %reason, "Skipping pending folder");
                slots[position] = Some(ImportOutcome::skipped(name, reason));
            }
        }

        let imported = self.import_batch(items).await;
        for (position, outcome) in positions.into_iter().zip(imported.details) {
            slots[position] = Some(outcome);
        }

        ImportSummary::from_outcomes(slots.into_iter().flatten().collect())
    }

    async fn import_one(&self, item: &ImportItem) -> ImportOutcome {
        if item.folder_name.trim().is_empty() {
            return ImportOutcome::skipped(&item.folder_name, REASON_EMPTY_FOLDER);
        }
        if !is_plain_folder_name(&item.folder_name) {
            warn!(folder = %item.folder_name, "Rejected folder name outside the import root");
            return ImportOutcome::skipped(&item.folder_name, REASON_INVALID_FOLDER);
        }

        match self.try_import(item).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(folder = %item.folder_name, error = %e, "Import failed");
                ImportOutcome::failed(item, e.to_string())
            }
        }
    }

    async fn try_import(&self, item: &ImportItem) -> Result<ImportOutcome> {
        let model_id = self.catalog.find_or_create_model(&item.model).await?;

        let studio = item.studio.trim();
        if studio.is_empty() {
            return Ok(ImportOutcome::failed(item, REASON_STUDIO_MISSING));
        }
        let Some(studio_id) = self.catalog.find_studio(studio).await? else {
            info!(folder = %item.folder_name, studio, "Studio not in catalog");
            return Ok(ImportOutcome::failed(item, REASON_STUDIO_NOT_FOUND));
        };

        let album_id = self
            .catalog
            .create_album(NewAlbum {
                title: item.folder_name.clone(),
                studio_id,
                model_id,
                source_url: placeholder_source_url(),
            })
            .await?;

        if let Err(e) = self.relocate(&item.folder_name, album_id).await {
            warn!(
                folder = %item.folder_name,
                album_id,
                error = %e,
                "Folder move failed; album record kept"
            );
            return Ok(ImportOutcome::failed(item, REASON_MOVE_FAILED).with_album_id(album_id));
        }

        info!(folder = %item.folder_name, album_id, "Album imported");
        Ok(ImportOutcome::success(item, album_id))
    }

    async fn relocate(&self, folder_name: &str, album_id: i64) -> Result<()> {
        let source = self.config.import_root.join(folder_name);
        let destination = self.config.storage_root.join(album_id.to_string());

        self.folders
            .make_directory(&self.config.storage_root, true)
            .await?;

        if self.folders.path_exists(&destination).await {
            self.folders.remove_recursive(&destination).await?;
        }

        self.folders.move_directory(&source, &destination).await?;

        if !self.folders.path_exists(&destination).await {
            return Err(catalog_common::Error::NotFound(format!(
                "Destination missing after move: {}",
                destination.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_urls_are_unique() {
        let a = placeholder_source_url();
        let b = placeholder_source_url();
        assert!(a.starts_with("local-import://"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_plain_folder_names() {
        assert!(is_plain_folder_name("[MetArt][Emma]Set 1"));
        assert!(is_plain_folder_name("Emma @ MetArt"));
        assert!(is_plain_folder_name("..hidden-ish"));

        assert!(!is_plain_folder_name(".."));
        assert!(!is_plain_folder_name("."));
        assert!(!is_plain_folder_name("../private"));
        assert!(!is_plain_folder_name("/etc"));
        assert!(!is_plain_folder_name("a/b"));
        assert!(!is_plain_folder_name("a\\b"));
        assert!(!is_plain_folder_name("Set/"));
    }
}
