//! CLI configuration file.
//!
//! The file is TOML:
//!
//! ```toml
//! log_level = "debug"
//!
//! [archive]
//! compression = "stored"
//! compression_level = 6
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use textbundle::ArchiveOptions;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "textbundle.toml";

/// Settings read from `textbundle.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Options for every archive the CLI writes
    #[serde(default)]
    pub archive: ArchiveOptions,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            archive: ArchiveOptions::default(),
        }
    }
}

impl FromStr for CliConfig {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl CliConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `default_path` is read when
    /// present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if default_path.is_file() => Self::from_file(default_path),
            None => Ok(Self::default()),
        }
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        text.parse()
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
