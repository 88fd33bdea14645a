//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ti_core::WalkerConfig;

/// Application configuration.
///
/// The walker fields (`start`, `end`, `interval_secs`) sit at the top level
/// of the file and fill in for `--start`, `--end` and `--interval`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub walker: WalkerConfig,

    /// Aggregation function when `--function` is not given.
    pub function: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            walker: WalkerConfig::default(),
            function: "count".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TI_*)
        figment = figment.merge(Env::prefixed("TI_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for ti.
///
/// On Linux: `~/.config/ti`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ti"))
}
