//! Path and display configuration.
//!
//! Every component takes its file locations from [`Settings`]; nothing in the
//! crate computes working-directory-relative paths on its own.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the data directory
const ENV_DATA_DIR: &str = "DEVWATCH_DATA_DIR";

const TOKEN_CACHE_FILE: &str = "token_cache.csv";
const CREDENTIAL_FILE: &str = "cred_list.csv";
const SNAPSHOT_DIR: &str = "snapshots";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    storage: Option<StorageConfig>,
    display: Option<DisplayConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct StorageConfig {
    /// Directory holding the token cache and device snapshots
    data_dir: Option<String>,
    /// Controller credential file (defaults to cred_list.csv in the config dir)
    credential_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DisplayConfig {
    /// DNS suffix stripped from hostnames in console reports
    strip_suffix: Option<String>,
}

/// Resolved file locations for a run
#[derive(Debug, Clone)]
pub struct Paths {
    /// Delimited credential file keyed by logical controller name
    pub credential_file: PathBuf,
    /// Single-entry token cache file
    pub token_cache_file: PathBuf,
    /// Directory holding one snapshot file per device family
    pub snapshot_dir: PathBuf,
}

/// Runtime settings assembled from env, config file, and defaults
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: Paths,
    /// DNS suffix stripped from hostnames for display, if any
    pub strip_suffix: Option<String>,
    /// Source of the data directory setting (for logging)
    pub source: ConfigSource,
}

/// Where the configuration came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigSource {
    /// Using default locations
    Default,
    /// Loaded from environment variable
    Environment,
    /// Loaded from config file
    ConfigFile,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
        }
    }
}

/// Get the devwatch config directory
fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("devwatch"))
}

/// Get the path to the configuration file
fn get_config_file_path() -> Option<PathBuf> {
    get_config_dir().map(|p| p.join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .map(|p| p.join("devwatch"))
        .unwrap_or_else(|| PathBuf::from("devwatch-data"))
}

/// Load configuration from the config file
fn load_config_file() -> Option<ConfigFile> {
    let path = get_config_file_path()?;

    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

/// Resolve runtime settings with priority:
/// 1. Environment variable (DEVWATCH_DATA_DIR)
/// 2. Config file (~/.config/devwatch/config.toml)
/// 3. Default locations
pub fn load_settings() -> Settings {
    let config = load_config_file();

    let strip_suffix = config
        .as_ref()
        .and_then(|c| c.display.as_ref())
        .and_then(|d| d.strip_suffix.clone())
        .filter(|s| !s.is_empty());

    let credential_override = config
        .as_ref()
        .and_then(|c| c.storage.as_ref())
        .and_then(|s| s.credential_file.clone())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    // Priority 1: environment variable
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        let dir = dir.trim();
        if !dir.is_empty() {
            tracing::info!("Using data directory from environment variable: {}", dir);
            return assemble(PathBuf::from(dir), credential_override, strip_suffix, ConfigSource::Environment);
        }
    }

    // Priority 2: config file
    if let Some(dir) = config
        .as_ref()
        .and_then(|c| c.storage.as_ref())
        .and_then(|s| s.data_dir.clone())
        .filter(|s| !s.is_empty())
    {
        tracing::info!("Using data directory from config file: {}", dir);
        return assemble(PathBuf::from(dir), credential_override, strip_suffix, ConfigSource::ConfigFile);
    }

    // Priority 3: defaults
    let data_dir = default_data_dir();
    tracing::debug!("Using default data directory: {:?}", data_dir);
    assemble(data_dir, credential_override, strip_suffix, ConfigSource::Default)
}

fn assemble(
    data_dir: PathBuf,
    credential_override: Option<PathBuf>,
    strip_suffix: Option<String>,
    source: ConfigSource,
) -> Settings {
    let credential_file = credential_override.unwrap_or_else(|| {
        get_config_dir()
            .map(|d| d.join(CREDENTIAL_FILE))
            .unwrap_or_else(|| PathBuf::from(CREDENTIAL_FILE))
    });

    Settings {
        paths: Paths {
            credential_file,
            token_cache_file: data_dir.join(TOKEN_CACHE_FILE),
            snapshot_dir: data_dir.join(SNAPSHOT_DIR),
        },
        strip_suffix,
        source,
    }
}

/// Create the data directory tree if it does not exist yet
pub fn ensure_data_dirs(paths: &Paths) -> Result<()> {
    if let Some(parent) = paths.token_cache_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }
    fs::create_dir_all(&paths.snapshot_dir)
        .with_context(|| format!("Failed to create snapshot directory {:?}", paths.snapshot_dir))?;
    Ok(())
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/devwatch/config.toml".to_string())
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# devwatch configuration
# Place this file at: ~/.config/devwatch/config.toml

[storage]
# Directory holding the token cache and device snapshots
# data_dir = "/var/lib/devwatch"

# Controller credential file (delimited, header row:
# hostname,host,username,password,https_port)
# credential_file = "/etc/devwatch/cred_list.csv"

[display]
# DNS suffix stripped from hostnames in console reports
# strip_suffix = ".corp.example.com"
"#
    .to_string()
}
