//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable that overrides the stored API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,
    #[serde(default = "default_backdrop_base_url")]
    pub backdrop_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    // Network
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    // Catalog
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    #[serde(default = "default_overview_limit")]
    pub overview_limit: usize,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

fn default_api_base_url() -> String { "https://api.themoviedb.org/3".to_string() }
fn default_poster_base_url() -> String { "https://image.tmdb.org/t/p/w500".to_string() }
fn default_backdrop_base_url() -> String { "https://image.tmdb.org/t/p/original".to_string() }
fn default_language() -> String { "en-US".to_string() }
fn default_request_timeout() -> u64 { 20 }
fn default_connect_timeout() -> u64 { 10 }
fn default_total_pages() -> u32 { 5 }
fn default_overview_limit() -> usize { 235 }
fn default_true() -> bool { true }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            poster_base_url: default_poster_base_url(),
            backdrop_base_url: default_backdrop_base_url(),
            language: default_language(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            total_pages: default_total_pages(),
            overview_limit: default_overview_limit(),
            dark_mode: true,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("movie_catalog");
        path.push("config.json");
        path
    }

    /// Load from the default location, falling back to defaults on any error.
    /// `TMDB_API_KEY` wins over the stored key.
    pub fn load() -> Self {
        let path = Self::config_path();

        let mut config = if path.exists() {
            match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("{e}; using defaults");
                    Self::default()
                }
            }
        } else {
            log::debug!("No config file at {}", path.display());
            Self::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.apply_api_key_override(&key);
        }

        config
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_api_key_override(&mut self, key: &str) {
        let key = key.trim();
        if !key.is_empty() {
            self.api_key = key.to_string();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    /// Number of catalog pages offered, never less than one
    pub fn total_pages(&self) -> u32 {
        self.total_pages.max(1)
    }
}
