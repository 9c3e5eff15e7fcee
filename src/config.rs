//! Config file loading and creation
//!
//! Config lives at ~/.config/cv-bias-check/config.toml.
//! All fields are optional; anything left out falls back to the built-in
//! tables, and CLI flags override config values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::profile::tables::ProfileTables;

/// Contents of the config file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fixed seed for reproducible profile sequences
    pub seed: Option<u64>,
    /// Replacement lookup tables
    pub tables: ProfileTables,
}

impl AppConfig {
    /// Parse a config from TOML text and validate its tables
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.tables.validate()?;
        Ok(config)
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# cv-bias-check configuration
# All values here can be overridden by CLI flags.
# Any table left out uses the built-in list.

# Fixed seed for a reproducible sequence of profiles
# seed = 42

# [tables]
# Substrings of an education entry that mark a prestige university
# prestige_markers = [\"Russell\", \"Oxford\", \"Cambridge\"]
# universities = [\"Local Post-92 University\", \"Russell Group University\", \"Oxford/Cambridge\", \"International University\"]
# experiences = [\"2 years retail at Tesco\", \"18 months office admin\"]
# extracurriculars = [\"Cricket club captain\", \"Community volunteer\"]

# Name buckets. origin is \"western\" or \"non_western\"; both must appear.
# [[tables.name_buckets]]
# label = \"male_western\"
# origin = \"western\"
# names = [\"James Wilson\", \"Oliver Smith\", \"Thomas Brown\"]
#
# [[tables.name_buckets]]
# label = \"male_non_western\"
# origin = \"non_western\"
# names = [\"Mohammed Khan\", \"Wei Zhang\", \"Raj Patel\"]
";

/// Returns the default config path: ~/.config/cv-bias-check/config.toml
pub fn config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("cv-bias-check")
            .join("config.toml"),
    )
}

/// Load config from a file path. Returns defaults if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            tracing::debug!(path = %path.display(), "loading config");
            AppConfig::from_toml(&content)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io(e)),
    }
}

/// Write the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.display().to_string()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    Ok(())
}
