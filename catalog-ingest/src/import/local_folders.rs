//! Local filesystem folder store

use super::FolderStore;
use catalog_common::{Error, Result};
use std::path::Path;
use walkdir::WalkDir;

/// `tokio::fs` implementation; cross-device moves fall back to copy + delete
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFolderStore;

impl LocalFolderStore {
    pub fn new() -> Self {
        Self
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
        || name.starts_with('$')
        || name.eq_ignore_ascii_case("System Volume Information")
}

/// Blocking copy + delete used when `rename` fails (e.g. across filesystems)
fn move_dir_fallback(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::NotFound(format!("Source folder missing: {}", from.display())));
    }

    std::fs::create_dir_all(to)?;

    let mut options = fs_extra::dir::CopyOptions::new();
    options.content_only = true;

    fs_extra::dir::move_dir(from, to, &options)
        .map(|_| ())
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
}

#[async_trait::async_trait]
impl FolderStore for LocalFolderStore {
    async fn path_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn make_directory(&self, path: &Path, recursive: bool) -> Result<()> {
        if recursive {
            tokio::fs::create_dir_all(path).await?;
        } else {
            tokio::fs::create_dir(path).await?;
        }
        Ok(())
    }

    async fn remove_recursive(&self, path: &Path) -> Result<()> {
        let metadata = match tokio::fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await?;
        } else {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }

    async fn move_directory(&self, from: &Path, to: &Path) -> Result<()> {
        match tokio::fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %e,
                    "rename failed (cross-device?), falling back to copy + delete"
                );

                let from = from.to_path_buf();
                let to = to.to_path_buf();
                tokio::task::spawn_blocking(move || move_dir_fallback(&from, &to))
                    .await
                    .map_err(|e| Error::Internal(format!("Move task failed: {}", e)))?
            }
        }
    }

    async fn list_candidate_folders(&self, root: &Path) -> Result<Vec<String>> {
        let root = root.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let mut names = Vec::new();
            for entry in WalkDir::new(&root).min_depth(1).max_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    Error::Io(std::io::Error::other(format!(
                        "Cannot list {}: {}",
                        root.display(),
                        e
                    )))
                })?;

                if !entry.file_type().is_dir() {
                    continue;
                }

                let name = entry.file_name().to_string_lossy().into_owned();
                if !is_hidden(&name) {
                    names.push(name);
                }
            }
            Ok(names)
        })
        .await
        .map_err(|e| Error::Internal(format!("Listing task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_candidate_folders_skips_files_and_hidden() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("[MetArt][Emma]B")).unwrap();
        std::fs::create_dir(temp.path().join("Emma @ MetArt")).unwrap();
        std::fs::create_dir(temp.path().join(".cache")).unwrap();
        std::fs::create_dir_all(temp.path().join("[MetArt][Emma]B").join("nested")).unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();

        let names = LocalFolderStore::new()
            .list_candidate_folders(temp.path())
            .await
            .unwrap();

        assert_eq!(names, vec!["Emma @ MetArt", "[MetArt][Emma]B"]);
    }

    #[tokio::test]
    async fn test_list_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let result = LocalFolderStore::new()
            .list_candidate_folders(&temp.path().join("absent"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_move_directory_with_contents() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("source");
        let to = temp.path().join("storage").join("1");
        std::fs::create_dir_all(&from).unwrap();
        std::fs::write(from.join("01.jpg"), b"jpeg").unwrap();
        std::fs::create_dir_all(temp.path().join("storage")).unwrap();

        let store = LocalFolderStore::new();
        store.move_directory(&from, &to).await.unwrap();

        assert!(!store.path_exists(&from).await);
        assert!(store.path_exists(&to.join("01.jpg")).await);
    }

    #[tokio::test]
    async fn test_remove_recursive_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("old");
        std::fs::create_dir_all(dir.join("inner")).unwrap();

        let store = LocalFolderStore::new();
        store.remove_recursive(&dir).await.unwrap();
        store.remove_recursive(&dir).await.unwrap();
        assert!(!store.path_exists(&dir).await);
    }

    #[tokio::test]
    async fn test_move_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let result = LocalFolderStore::new()
            .move_directory(&temp.path().join("nope"), &temp.path().join("dest"))
            .await;
        assert!(result.is_err());
        assert!(!temp.path().join("dest").exists());
    }

    #[test]
    fn test_hidden_names() {
        assert!(is_hidden(".DS_Store"));
        assert!(is_hidden("$RECYCLE.BIN"));
        assert!(!is_hidden("[MetArt][Emma]Set"));
    }
}
