//! Optional TOML configuration for the CLI.
//!
//! Looked up at `.attest/config.toml` relative to the working directory.
//! Every key is optional; command-line flags override config values, and
//! built-in defaults cover the rest.
//!
//! ```toml
//! log_path = ".attest/events.jsonl"
//! page_size = 20
//! tolerant_reads = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use attest_contracts::{LogError, LogResult};

/// Where the CLI looks for its configuration file.
pub const CONFIG_PATH: &str = ".attest/config.toml";

/// The log file used when neither `--log` nor the config file names one.
pub const DEFAULT_LOG_PATH: &str = ".attest/events.jsonl";

/// Page size used when neither `--page-size` nor the config file names one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// CLI configuration, all fields optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CliConfig {
    /// Default event log path.
    pub log_path: Option<PathBuf>,
    /// Default page size for `show`.
    pub page_size: Option<usize>,
    /// Skip malformed lines (reporting each skip) instead of aborting.
    #[serde(default)]
    pub tolerant_reads: bool,
}

impl CliConfig {
    /// Parse `s` as TOML configuration.
    pub fn from_toml_str(s: &str) -> LogResult<Self> {
        toml::from_str(s).map_err(|e| LogError::Config {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    /// Read and parse the file at `path`.
    pub fn from_file(path: &Path) -> LogResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LogError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `.attest/config.toml` if present; defaults otherwise.
    pub fn load_default() -> LogResult<Self> {
        let path = Path::new(CONFIG_PATH);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliConfig;

    #[test]
    fn full_config_parses() {
        let config = CliConfig::from_toml_str(
            "log_path = \"/var/log/events.jsonl\"\npage_size = 50\ntolerant_reads = true\n",
        )
        .unwrap();
        assert_eq!(
            config.log_path.as_deref().unwrap().to_str(),
            Some("/var/log/events.jsonl")
        );
        assert_eq!(config.page_size, Some(50));
        assert!(config.tolerant_reads);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert!(config.log_path.is_none());
        assert!(config.page_size.is_none());
        assert!(!config.tolerant_reads);
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let err = CliConfig::from_toml_str("page_size = \"twenty\"").unwrap_err();
        assert!(err.to_string().contains("configuration error"));
    }
}
