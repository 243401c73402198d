//! TOML-based configuration for the planner.
//!
//! Reads `AppConfig` from the platform-appropriate config file (or `--config`),
//! and writes it back for `room-planner --write-config`:
//! - Windows:  `%APPDATA%\RoomPlanner\config.toml`
//! - Linux:    `~/.config/roomplanner/config.toml`
//! - macOS:    `~/Library/Application Support/RoomPlanner/config.toml`
//!
//! Example:
//!
//! ```toml
//! [planner]
//! log_level = "debug"
//! rotation_snap_degrees = 15.0
//!
//! [room]
//! width = 12.0
//! length = 16.0
//! height = 9.0
//!
//! [persistence]
//! request_timeout_ms = 2000
//! max_attempts = 5
//!
//! [[palette]]
//! name = "Teal"
//! color = "#008080"
//! ```
//!
//! Every field has a `#[serde(default = "...")]` so the app runs on first
//! start (no file) and keeps working when an older file lacks newer fields.
//! `[[catalog]]` and `[[palette]]` replace the built-in lists entirely when
//! present.

use std::path::{Path, PathBuf};
use std::time::Duration;

use room_core::domain::room::{DEFAULT_HEIGHT, DEFAULT_LENGTH, DEFAULT_WIDTH};
use room_core::{Catalog, CatalogError, FurnitureArchetype, LayoutError, NamedColor, Room};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::persist_layout::RetryPolicy;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub room: RoomConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Furniture archetypes in picker order.
    #[serde(default = "default_catalog")]
    pub catalog: Vec<FurnitureArchetype>,
    /// Colors in picker order.
    #[serde(default = "default_palette")]
    pub palette: Vec<NamedColor>,
}

/// General planner behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    /// Schema version string – bump when breaking changes are introduced.
    #[serde(default = "default_version")]
    pub version: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Rotate-drag increment in degrees.  `0` rotates freely.
    #[serde(default)]
    pub rotation_snap_degrees: f64,
}

/// Dimensions of the room a new layout starts with, in feet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RoomConfig {
    #[serde(default = "default_room_width")]
    pub width: f64,
    #[serde(default = "default_room_length")]
    pub length: f64,
    #[serde(default = "default_room_height")]
    pub height: f64,
}

/// Layout storage and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistenceConfig {
    /// Directory holding saved layouts.  Defaults to `layouts/` next to the
    /// config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    /// Upper bound for a single repository call.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Total attempts per save or load, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_version() -> String {
    "1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_room_width() -> f64 {
    DEFAULT_WIDTH
}
fn default_room_length() -> f64 {
    DEFAULT_LENGTH
}
fn default_room_height() -> f64 {
    DEFAULT_HEIGHT
}
fn default_request_timeout_ms() -> u64 {
    5000
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    200
}
fn default_catalog() -> Vec<FurnitureArchetype> {
    Catalog::default().list_all().cloned().collect()
}
fn default_palette() -> Vec<NamedColor> {
    Catalog::default().palette().to_vec()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            room: RoomConfig::default(),
            persistence: PersistenceConfig::default(),
            catalog: default_catalog(),
            palette: default_palette(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            log_level: default_log_level(),
            rotation_snap_degrees: 0.0,
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: default_room_width(),
            length: default_room_length(),
            height: default_room_height(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            request_timeout_ms: default_request_timeout_ms(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

// ── Conversions into domain values ────────────────────────────────────────────

impl AppConfig {
    /// Builds the session catalog from `[[catalog]]` and `[[palette]]`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if either list is empty or invalid.
    pub fn to_catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.catalog.clone(), self.palette.clone())
    }
}

impl RoomConfig {
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDimension`] for non-positive dimensions.
    pub fn to_room(&self) -> Result<Room, LayoutError> {
        Room::new(self.width, self.length, self.height)
    }
}

impl PersistenceConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(self.request_timeout_ms),
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    /// The configured storage directory, or `layouts/` in the config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] if no directory is
    /// configured and the platform directory cannot be determined.
    pub fn resolve_storage_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(config_dir()?.join("layouts")),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("RoomPlanner"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("roomplanner"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("RoomPlanner")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
