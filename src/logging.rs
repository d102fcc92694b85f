//! Logging System
//!
//! Structured logging via `tracing`, with configurable level, format (text or
//! json), and destination (stdout, stderr, or file). Level resolution honors
//! the `NEURODRIVE_LOG` environment filter when present.

use crate::error::DriveError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is file; None means the runtime default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enabled: true,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: true,
        }
    }
}

/// Resolve the log file path with precedence: CLI flag, `NEURODRIVE_LOG_FILE`
/// env, config file, platform state directory default.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, DriveError> {
    let env_file = std::env::var("NEURODRIVE_LOG_FILE")
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    resolve_from_sources(cli_file, env_file, config_file)
}

/// Precedence over explicit sources; the env lookup stays in the caller so
/// this stays deterministic under test.
fn resolve_from_sources(
    cli_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, DriveError> {
    for candidate in [cli_file, env_file, config_file] {
        if let Some(p) = candidate {
            if !p.as_os_str().is_empty() {
                return Ok(p);
            }
        }
    }
    let project_dirs = directories::ProjectDirs::from("", "neurozsis", "neurodrive")
        .ok_or_else(|| {
            DriveError::ConfigError(
                "Could not determine platform state directory for log file".to_string(),
            )
        })?;
    let state_dir = project_dirs
        .state_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_dirs.data_local_dir().to_path_buf());
    Ok(state_dir.join("neurodrive.log"))
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env("NEURODRIVE_LOG").unwrap_or_else(|_| {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Initialize the global tracing subscriber from config.
///
/// Safe to call once per process; a second call reports a config error from
/// `try_init` rather than panicking.
pub fn init_logging(config: &LoggingConfig) -> Result<(), DriveError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = env_filter(&config.level);
    let timer = ChronoUtc::rfc_3339();
    let json = config.format == "json";

    match config.output.as_str() {
        "stdout" => {
            let builder = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_ansi(config.color)
                .with_writer(std::io::stdout);
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        "stderr" => {
            let builder = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_ansi(config.color)
                .with_writer(std::io::stderr);
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        "file" => {
            let path = resolve_log_file_path(None, config.file.clone())?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DriveError::ConfigError(format!(
                        "Failed to create log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    DriveError::ConfigError(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            let builder = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        other => {
            return Err(DriveError::ConfigError(format!(
                "Unknown log output '{}'",
                other
            )))
        }
    }
    .map_err(|e| DriveError::ConfigError(format!("Failed to initialize logging: {}", e)))
}
