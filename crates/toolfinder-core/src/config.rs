use serde::Deserialize;
use std::path::{Path, PathBuf};
use toolfinder_api::GITHUB_GRAPHQL_URL;

use crate::reader::DEFAULT_PAGE_SIZE;
use crate::search::{SearchOptions, DEFAULT_CHANNEL_CAPACITY};

/// Main configuration structure
///
/// Loaded from `config.toml` in the user config directory. Every key is
/// optional. Priority: CLI > Env > File > Defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Token to use given an optional override from the command line or env
    pub fn token(&self, preferred: Option<String>) -> Option<String> {
        preferred
            .filter(|t| !t.is_empty())
            .or_else(|| self.github.token.clone())
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            page_size: self.search.page_size,
            channel_capacity: self.search.channel_capacity,
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if !(1..=DEFAULT_PAGE_SIZE).contains(&self.search.page_size) {
            return Err(crate::Error::ConfigError(format!(
                "search.page_size must be between 1 and {}, got {}",
                DEFAULT_PAGE_SIZE, self.search.page_size
            )));
        }

        if self.search.channel_capacity == 0 {
            return Err(crate::Error::ConfigError(
                "search.channel_capacity must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Get the config file path
    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("toolfinder");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// GitHub personal access token
    pub token: Option<String>,

    /// GraphQL endpoint (for GitHub Enterprise)
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    GITHUB_GRAPHQL_URL.to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
