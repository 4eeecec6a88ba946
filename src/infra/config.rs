//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use crate::domain::types::SortKey;
use crate::io::loader::DataSource;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config/dev.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Venue list: local path or http(s) URL
    #[serde(default = "default_venues")]
    pub venues: String,
    /// Suburb groups document; empty to disable grouping
    #[serde(default = "default_suburb_groups")]
    pub suburb_groups: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { venues: default_venues(), suburb_groups: default_suburb_groups() }
    }
}

fn default_venues() -> String {
    "data/venues.json".to_string()
}

fn default_suburb_groups() -> String {
    "data/suburb-groups.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: default_http_timeout_ms() }
    }
}

fn default_http_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavouritesConfig {
    #[serde(default = "default_favourites_file")]
    pub file: String,
}

impl Default for FavouritesConfig {
    fn default() -> Self {
        Self { file: default_favourites_file() }
    }
}

fn default_favourites_file() -> String {
    "favourites.json".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub default_sort: SortKey,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TuiConfig {
    /// Panel slide duration
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_tui_log_file")]
    pub log_file: String,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { transition_ms: default_transition_ms(), log_file: default_tui_log_file() }
    }
}

fn default_transition_ms() -> u64 {
    300
}

fn default_tui_log_file() -> String {
    "brunch-tui.log".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub favourites: FavouritesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    venues: String,
    suburb_groups: String,
    http_timeout_ms: u64,
    favourites_file: String,
    default_sort: SortKey,
    transition_ms: u64,
    tui_log_file: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            venues: toml_config.data.venues,
            suburb_groups: toml_config.data.suburb_groups,
            http_timeout_ms: toml_config.http.timeout_ms,
            favourites_file: toml_config.favourites.file,
            default_sort: toml_config.display.default_sort,
            transition_ms: toml_config.tui.transition_ms,
            tui_log_file: toml_config.tui.log_file,
            config_file,
        }
    }

    /// Determine config file path from the command line or environment
    pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries the TOML file first, falls back to defaults.
    /// Runs before logging is installed, so problems go to stderr.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn load(explicit: Option<&Path>) -> Self {
        Self::load_from_path(Self::resolve_config_path(explicit))
    }

    pub fn venues(&self) -> &str {
        &self.venues
    }

    pub fn venues_source(&self) -> DataSource {
        source_of(&self.venues)
    }

    pub fn suburb_groups(&self) -> &str {
        &self.suburb_groups
    }

    /// None when grouping is switched off
    pub fn suburb_groups_source(&self) -> Option<DataSource> {
        (!self.suburb_groups.trim().is_empty()).then(|| source_of(&self.suburb_groups))
    }

    pub fn http_timeout_ms(&self) -> u64 {
        self.http_timeout_ms
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn favourites_file(&self) -> &str {
        &self.favourites_file
    }

    pub fn default_sort(&self) -> SortKey {
        self.default_sort
    }

    pub fn transition_ms(&self) -> u64 {
        self.transition_ms
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn tui_log_file(&self) -> &str {
        &self.tui_log_file
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Command-line overrides
    pub fn with_venues(mut self, venues: impl Into<String>) -> Self {
        self.venues = venues.into();
        self
    }

    pub fn with_suburb_groups(mut self, suburb_groups: impl Into<String>) -> Self {
        self.suburb_groups = suburb_groups.into();
        self
    }
}

fn source_of(raw: &str) -> DataSource {
    match raw.parse() {
        Ok(source) => source,
        Err(never) => match never {},
    }
}
