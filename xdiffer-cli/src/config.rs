//! CLI configuration
//!
//! Configuration loaded from xdiffer.toml, looked up in the current
//! directory first and then in the home directory.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "xdiffer.toml";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// A file was found but could not be parsed.
    Invalid(PathBuf, String),
    Defaults,
}

/// Configuration of the `xdiffer` command.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when RUST_LOG is not set (e.g. "warn", "debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Print nodes without differences in the tree view
    #[serde(default)]
    pub show_unchanged: bool,

    /// Spaces per nesting level in the tree view
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_indent() -> usize {
    2
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            show_unchanged: false,
            indent: default_indent(),
        }
    }
}

impl CliConfig {
    /// Load config from CWD first, then home directory, or use defaults.
    ///
    /// Runs before the logger exists, so the outcome is returned for the
    /// caller to report.
    pub fn load() -> (Self, ConfigSource) {
        let candidates = [Some(PathBuf::from(CONFIG_FILE)), home_config_path()];
        for path in candidates.into_iter().flatten() {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            return match Self::parse(&content) {
                Ok(config) => (config, ConfigSource::File(path)),
                Err(e) => (Self::default(), ConfigSource::Invalid(path, e.to_string())),
            };
        }
        (Self::default(), ConfigSource::Defaults)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl ConfigSource {
    /// Reports the outcome of `CliConfig::load` through the logger.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => log::info!("Loaded config from {}", path.display()),
            ConfigSource::Invalid(path, e) => {
                log::warn!("Failed to parse config file {}: {}", path.display(), e)
            }
            ConfigSource::Defaults => log::debug!("Using default config"),
        }
    }
}

/// Returns ~/xdiffer.toml if a home directory is known.
fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE))
}
