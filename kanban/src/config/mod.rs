//! Configuration for the `kanban` binary.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/kanban/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};

use crate::cli::CliCommand;
use crate::commands::DEFAULT_MAX_TITLE_LEN;
use crate::storage::DEFAULT_STORAGE_KEY;

/// Default chrono format for task timestamps: two-digit day, month and year.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    board: BoardFileConfig,
    user: UserFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
    key: Option<String>,
}

/// `[board]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardFileConfig {
    max_title_len: Option<usize>,
    timestamp_format: Option<String>,
}

/// `[user]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UserFileConfig {
    id: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanConfig {
    // -- Storage --
    /// Directory holding the board file.
    pub data_dir: PathBuf,
    /// Storage key the board is saved under.
    pub storage_key: String,

    // -- Board --
    /// Maximum task title length in characters.
    pub max_title_len: usize,
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,

    // -- User --
    /// Id new tasks are attributed to. `None` means anonymous.
    pub user_id: Option<String>,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            max_title_len: DEFAULT_MAX_TITLE_LEN,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            user_id: None,
        }
    }
}

impl KanbanConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// Otherwise the default path (`~/.config/kanban/config.toml`) is tried
    /// and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `KanbanConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone())
                .unwrap_or(defaults.data_dir),
            storage_key: file
                .storage
                .key
                .clone()
                .unwrap_or(defaults.storage_key),
            max_title_len: file
                .board
                .max_title_len
                .unwrap_or(defaults.max_title_len),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| file.board.timestamp_format.clone())
                .unwrap_or(defaults.timestamp_format),
            user_id: cli.user.clone().or_else(|| file.user.id.clone()),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Kanban board in your terminal")]
pub struct CliArgs {
    /// Directory the board is stored in.
    #[arg(long, env = "KANBAN_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// User id new tasks are attributed to.
    #[arg(long, env = "KANBAN_USER", global = true)]
    pub user: Option<String>,

    /// Path to config file (default: `~/.config/kanban/config.toml`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Timestamp display format (chrono format string).
    #[arg(long, global = true)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "KANBAN_LOG", global = true)]
    pub log_level: String,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// What to do. Defaults to `show`.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Default board directory: the platform data dir, else `./.kanban`.
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".kanban"), |dir| dir.join("kanban"))
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("kanban").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
