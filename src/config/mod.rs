//! Configuration
//!
//! Layered configuration: optional TOML file, then `NEURODRIVE_*` environment
//! overrides. The storage path defaults to the platform data directory when
//! not set explicitly.

use crate::error::DriveError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_workspace() -> String {
    "default".to_string()
}

/// Storage configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the snapshot store; None means the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the store path to an actual filesystem location.
    pub fn resolve_store_path(&self) -> Result<PathBuf, DriveError> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => {
                let project_dirs = directories::ProjectDirs::from("", "neurozsis", "neurodrive")
                    .ok_or_else(|| {
                        DriveError::ConfigError(
                            "Could not determine platform data directory for store".to_string(),
                        )
                    })?;
                Ok(project_dirs.data_dir().join("store"))
            }
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Workspace key snapshots are stored under.
    #[serde(default = "default_workspace")]
    pub workspace: String,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            workspace: default_workspace(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an optional file plus environment overrides.
    ///
    /// Environment variables use the `NEURODRIVE_` prefix with `__` as the
    /// section separator, e.g. `NEURODRIVE_LOGGING__LEVEL=debug`.
    pub fn load(config_file: Option<&Path>) -> Result<DriveConfig, DriveError> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        let settings = builder
            .add_source(Environment::with_prefix("NEURODRIVE").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Write the default configuration to a TOML file.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> Result<(), DriveError> {
        if path.exists() && !force {
            return Err(DriveError::ConfigError(format!(
                "Config file {} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        let rendered = toml::to_string_pretty(&DriveConfig::default()).map_err(|e| {
            DriveError::ConfigError(format!("Failed to render default config: {}", e))
        })?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DriveError::ConfigError(format!(
                        "Failed to create config directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        std::fs::write(path, rendered).map_err(|e| {
            DriveError::ConfigError(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
}
