//! Dashboard settings loaded from an optional TOML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::{MAX_CLOUD_WORDS, SummaryLimits, TOP_JOURNALS};

/// File looked up in the working directory when no override is given.
pub const DEFAULT_CONFIG_FILE: &str = "cord-explorer.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "CORD_EXPLORER_CONFIG";

/// Where the cleaned export lands when the notebook is run from the repo root.
pub const DEFAULT_DATA_PATH: &str = "data/cleaned_metadata.csv";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DashboardConfig {
    /// Input table, relative to the working directory.
    pub data_path: PathBuf,
    /// Bars in the top-journals chart.
    pub top_journals: usize,
    /// Distinct words in the title cloud.
    pub max_cloud_words: usize,
    /// Rows in the selection preview table.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_journals: TOP_JOURNALS,
            max_cloud_words: MAX_CLOUD_WORDS,
            preview_rows: 100,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.  Zero limits are raised to one.
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let mut config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("parsing {}", config_path.display()))?;
        config.top_journals = config.top_journals.max(1);
        config.max_cloud_words = config.max_cloud_words.max(1);
        config.preview_rows = config.preview_rows.max(1);
        Ok(config)
    }

    /// The config path: `$CORD_EXPLORER_CONFIG` if set, else the default file.
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load `path` if it exists.  A missing file means defaults; a broken one
    /// is logged and also falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn summary_limits(&self) -> SummaryLimits {
        SummaryLimits {
            top_journals: self.top_journals,
            max_cloud_words: self.max_cloud_words,
        }
    }
}
