//! Import inputs, per-folder outcomes, and run summaries

use serde::{Deserialize, Serialize};

/// One folder scheduled for import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportItem {
    /// Directory name under the import root
    pub folder_name: String,
    pub studio: String,
    /// Blank means "no model"
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub title: String,
}

/// Per-folder result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Skipped,
    Failed,
}

/// Outcome of importing one folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub source_folder: String,
    pub status: ImportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Set on success, and on a failed move (the album row is kept)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ImportOutcome {
    pub fn success(item: &ImportItem, album_id: i64) -> Self {
        Self {
            source_folder: item.folder_name.clone(),
            status: ImportStatus::Success,
            reason: None,
            album_id: Some(album_id),
            studio: Some(item.studio.clone()),
            model: non_blank(&item.model),
            title: Some(item.folder_name.clone()),
        }
    }

    pub fn skipped(source_folder: &str, reason: impl Into<String>) -> Self {
        Self {
            source_folder: source_folder.to_string(),
            status: ImportStatus::Skipped,
            reason: Some(reason.into()),
            album_id: None,
            studio: None,
            model: None,
            title: None,
        }
    }

    pub fn failed(item: &ImportItem, reason: impl Into<String>) -> Self {
        Self {
            source_folder: item.folder_name.clone(),
            status: ImportStatus::Failed,
            reason: Some(reason.into()),
            album_id: None,
            studio: non_blank(&item.studio),
            model: non_blank(&item.model),
            title: None,
        }
    }

    pub fn with_album_id(mut self, album_id: i64) -> Self {
        self.album_id = Some(album_id);
        self
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Aggregate result of an import run
///
/// `success` reports whether the run itself completed; individual failures are counted
/// in `failed` and do not clear it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success: bool,
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub details: Vec<ImportOutcome>,
}

impl ImportSummary {
    /// Summary over completed outcomes, counters derived from `details`
    pub fn from_outcomes(details: Vec<ImportOutcome>) -> Self {
        Self {
            success: true,
            total: details.len(),
            imported: count_status(&details, ImportStatus::Success),
            skipped: count_status(&details, ImportStatus::Skipped),
            failed: count_status(&details, ImportStatus::Failed),
            details,
        }
    }

    /// Run could not start (e.g. import root unreadable)
    pub fn aborted() -> Self {
        Self {
            success: false,
            total: 0,
            imported: 0,
            skipped: 0,
            failed: 0,
            details: Vec::new(),
        }
    }

    pub fn count_by_status(&self, status: ImportStatus) -> usize {
        count_status(&self.details, status)
    }
}

fn count_status(details: &[ImportOutcome], status: ImportStatus) -> usize {
    details.iter().filter(|d| d.status == status).count()
}
