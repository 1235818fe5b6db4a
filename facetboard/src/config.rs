//! Configuration management.
//!
//! Default config location: ~/.facetboard/config.toml

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Master switch for the filter feature; a disabled host renders its
    /// default report without calling the engine.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether report scopes roll descendant projects into the base scope.
    /// Host-level setting, read once per aggregation call.
    #[serde(default = "default_true")]
    pub include_subprojects: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_subprojects: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber. `RUST_LOG` wins over the
    /// configured level. Hosts that already install their own subscriber
    /// skip this.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.level));

        if let Some(log_file) = &self.file {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Arc::new(file))
                .init();
        } else {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
        Ok(())
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Config> {
        Self::load_or_create(&Self::default_path()?)
    }

    /// Load from `path`, writing a default config there first when the file
    /// does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Config> {
        let path = expand_tilde(path)?;
        if !path.exists() {
            let config = Config::default();
            config.save(&path)?;
            return Ok(config);
        }
        let contents = fs::read_to_string(&path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let path = expand_tilde(path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".facetboard").join("config.toml"))
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    if !path.starts_with("~") {
        return Ok(path.to_path_buf());
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    if path == Path::new("~") {
        return Ok(home);
    }
    Ok(home.join(path.strip_prefix("~")?))
}
