//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CATALOG_ROOT_FOLDER`, then `CATALOG_ROOT`)
//! 3. TOML config file (`~/.config/catalog/<module>.toml`)
//! 4. OS-dependent compiled default (fallback)
//!
//! Missing or unreadable TOML files never abort startup: a warning is logged and
//! compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Primary environment variable for the root folder
pub const ENV_ROOT_FOLDER: &str = "CATALOG_ROOT_FOLDER";

/// Alternative (shorter) environment variable for the root folder
pub const ENV_ROOT: &str = "CATALOG_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "catalog.db";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level ("error", "warn", "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file path (stdout when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
        }
    }
}

/// Shared TOML configuration
///
/// Service-specific sections (heuristics, batch sizes) live in the same file and are
/// parsed by the owning service; unknown keys are ignored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the catalog database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    /// Folder scanned for import candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_root: Option<PathBuf>,

    /// Permanent storage folder receiving imported albums
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<PathBuf>,

    /// HTTP listen port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OS-dependent compiled defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was compiled for
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/catalog (or /var/lib/catalog for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("catalog"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/catalog"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("catalog"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/catalog"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("catalog"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\catalog"))
    } else {
        PathBuf::from("./catalog_data")
    }
}

/// Path of the TOML config file for a module (`<config_dir>/catalog/<module>.toml`)
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("catalog").join(format!("{}.toml", module_name)))
}

/// Load TOML config from an explicit path
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load a module's TOML config, degrading to defaults when missing or invalid
pub fn load_module_config_or_default(module_name: &str) -> TomlConfig {
    let Some(path) = config_file_path(module_name) else {
        return TomlConfig::default();
    };

    if !path.exists() {
        debug!(path = %path.display(), "No TOML config file, using defaults");
        return TomlConfig::default();
    }

    match load_toml_config(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{} - continuing with defaults", e);
            TomlConfig::default()
        }
    }
}

/// Write TOML config atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)?;

    Ok(())
}

/// Root folder resolution following the documented priority order
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
        }
    }

    /// Command-line override (highest priority)
    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    /// Resolve the root folder. Never fails; falls back to compiled defaults.
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ENV_ROOT_FOLDER) {
            return PathBuf::from(path);
        }

        if let Ok(path) = std::env::var(ENV_ROOT) {
            return PathBuf::from(path);
        }

        if let Some(root_folder) = load_module_config_or_default(&self.module_name).root_folder {
            return root_folder;
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and locates the database inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder (and parents) if missing. Idempotent.
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}
