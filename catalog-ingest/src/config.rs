//! Configuration resolution for catalog-ingest
//!
//! Shared keys (root folder, import/storage roots, port, logging) come from
//! `catalog_common::config::TomlConfig`. Service sections live in the same file:
//!
//! ```toml
//! [heuristics]
//! separator_at = 70
//!
//! [tiers]
//! high = 80
//! medium = 50
//!
//! [import]
//! batch_size = 10
//! ```
//!
//! **Priority:** CLI (with `CATALOG_*` env fallback, via clap) → TOML → compiled defaults

use catalog_common::config::{
    config_file_path, load_module_config_or_default, CompiledDefaults, RootFolderResolver,
    TomlConfig,
};
use catalog_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Module name; selects `~/.config/catalog/catalog-ingest.toml`
pub const MODULE_NAME: &str = "catalog-ingest";

pub const DEFAULT_PORT: u16 = 5810;

pub const ENV_IMPORT_ROOT: &str = "CATALOG_IMPORT_ROOT";
pub const ENV_STORAGE_ROOT: &str = "CATALOG_STORAGE_ROOT";
pub const ENV_PORT: &str = "CATALOG_INGEST_PORT";

/// Confidence constants assigned by each parsing branch (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub exact_studio: u8,
    pub exact_model: u8,
    pub exact_overall: u8,
    pub bracket_studio: u8,
    pub bracket_model: u8,
    pub separator_at: u8,
    pub separator_hyphen: u8,
    pub text_extraction: u8,
    /// Assigned to both fields when an operator edits an item
    pub human_verified: u8,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            exact_studio: 90,
            exact_model: 85,
            exact_overall: 88,
            bracket_studio: 90,
            bracket_model: 85,
            separator_at: 70,
            separator_hyphen: 60,
            text_extraction: 60,
            human_verified: 95,
        }
    }
}

/// Overall-confidence cut-offs for tier classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// overall >= high → High
    pub high: u8,
    /// medium <= overall < high → Medium
    pub medium: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { high: 80, medium: 50 }
    }
}

impl TierThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.medium > self.high || self.high > 100 {
            return Err(Error::Config(format!(
                "Invalid tier thresholds: high={} medium={} (need medium <= high <= 100)",
                self.high, self.medium
            )));
        }
        Ok(())
    }
}

/// `[import]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    pub batch_size: usize,
}

impl Default for ImportSection {
    fn default() -> Self {
        Self { batch_size: 10 }
    }
}

/// Service-specific TOML sections; shared keys are ignored here
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSections {
    pub heuristics: HeuristicsConfig,
    pub tiers: TierThresholds,
    pub import: ImportSection,
}

/// Parse the service sections from a TOML file
pub fn load_ingest_sections(path: &Path) -> Result<IngestSections> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

fn load_ingest_sections_or_default() -> IngestSections {
    let Some(path) = config_file_path(MODULE_NAME) else {
        return IngestSections::default();
    };
    if !path.exists() {
        return IngestSections::default();
    }
    match load_ingest_sections(&path) {
        Ok(sections) => sections,
        Err(e) => {
            warn!("{} - continuing with default heuristics", e);
            IngestSections::default()
        }
    }
}

/// Executor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Items per concurrent batch (at least 1)
    pub batch_size: usize,
    /// Folder holding candidate folders
    pub import_root: PathBuf,
    /// Permanent storage; albums land in `<storage_root>/<album_id>`
    pub storage_root: PathBuf,
}

impl ExecutorConfig {
    pub fn new(import_root: PathBuf, storage_root: PathBuf) -> Self {
        Self {
            batch_size: ImportSection::default().batch_size,
            import_root,
            storage_root,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Values supplied on the command line (or their `CATALOG_*` env fallbacks)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub import_root: Option<PathBuf>,
    pub storage_root: Option<PathBuf>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub root_folder: PathBuf,
    pub port: u16,
    pub log_level: String,
    /// Log to this file instead of stdout
    pub log_file: Option<PathBuf>,
    pub heuristics: HeuristicsConfig,
    pub tiers: TierThresholds,
    pub executor: ExecutorConfig,
}

impl IngestConfig {
    /// Resolve from CLI overrides, the module TOML file and compiled defaults
    pub fn resolve(cli: CliOverrides) -> Self {
        let toml_config = load_module_config_or_default(MODULE_NAME);
        let sections = load_ingest_sections_or_default();
        Self::from_sources(cli, &toml_config, sections)
    }

    /// Merge explicit sources (no file or env access)
    pub fn from_sources(
        cli: CliOverrides,
        toml_config: &TomlConfig,
        sections: IngestSections,
    ) -> Self {
        let root_folder = RootFolderResolver::new(MODULE_NAME)
            .with_cli_arg(cli.root_folder.or_else(|| toml_config.root_folder.clone()))
            .resolve();

        let import_root = cli
            .import_root
            .or_else(|| toml_config.import_root.clone())
            .unwrap_or_else(|| root_folder.join("import"));

        let storage_root = cli
            .storage_root
            .or_else(|| toml_config.storage_root.clone())
            .unwrap_or_else(|| root_folder.join("albums"));

        let port = cli.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);

        let log_level = cli
            .log_level
            .unwrap_or_else(|| toml_config.logging.level.clone());

        let tiers = match sections.tiers.validate() {
            Ok(()) => sections.tiers,
            Err(e) => {
                warn!("{} - using default tier thresholds", e);
                TierThresholds::default()
            }
        };

        debug!(
            root_folder = %root_folder.display(),
            import_root = %import_root.display(),
            storage_root = %storage_root.display(),
            "Resolved ingest configuration"
        );

        Self {
            root_folder,
            port,
            log_level,
            log_file: toml_config.logging.log_file.clone(),
            heuristics: sections.heuristics,
            tiers,
            executor: ExecutorConfig::new(import_root, storage_root)
                .with_batch_size(sections.import.batch_size),
        }
    }

    /// Defaults rooted at an explicit folder (tests and embedding)
    pub fn with_root(root_folder: PathBuf) -> Self {
        let executor = ExecutorConfig::new(root_folder.join("import"), root_folder.join("albums"));
        Self {
            root_folder,
            port: DEFAULT_PORT,
            log_level: CompiledDefaults::for_current_platform().log_level,
            log_file: None,
            heuristics: HeuristicsConfig::default(),
            tiers: TierThresholds::default(),
            executor,
        }
    }
}
