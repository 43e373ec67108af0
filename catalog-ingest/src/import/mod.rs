//! Import pipeline: executor plus the storage seams it runs against
//!
//! The executor only talks to [`CatalogStore`] and [`FolderStore`]; production
//! code wires in [`SqliteCatalog`] and [`LocalFolderStore`], tests substitute
//! their own implementations.

pub mod executor;
pub mod local_folders;
pub mod sqlite_catalog;

pub use executor::{
    is_plain_folder_name, placeholder_source_url, ImportExecutor, REASON_EMPTY_FOLDER,
    REASON_INVALID_FOLDER, REASON_MOVE_FAILED, REASON_STUDIO_MISSING, REASON_STUDIO_NOT_FOUND,
};
pub use local_folders::LocalFolderStore;
pub use sqlite_catalog::SqliteCatalog;

use crate::db::NewAlbum;
use catalog_common::Result;
use std::path::Path;

/// Catalog entities the executor reads and writes
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Studio id by name; never creates
    async fn find_studio(&self, name: &str) -> Result<Option<i64>>;

    /// Model id by name, created when missing; blank names resolve to `None`
    async fn find_or_create_model(&self, name: &str) -> Result<Option<i64>>;

    async fn create_album(&self, album: NewAlbum) -> Result<i64>;
}

/// Filesystem operations on import and storage roots
#[async_trait::async_trait]
pub trait FolderStore: Send + Sync {
    async fn path_exists(&self, path: &Path) -> bool;

    async fn make_directory(&self, path: &Path, recursive: bool) -> Result<()>;

    /// Remove a file or directory tree; missing paths are not an error
    async fn remove_recursive(&self, path: &Path) -> Result<()>;

    async fn move_directory(&self, from: &Path, to: &Path) -> Result<()>;

    /// Names of the candidate folders directly under `root`
    async fn list_candidate_folders(&self, root: &Path) -> Result<Vec<String>>;
}
