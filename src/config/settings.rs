//! Settings structures for StackSearch-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub catalog: CatalogSettings,
    pub search: SearchSettings,
    pub cache: CacheSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Locate and load a settings file, falling back to defaults.
    ///
    /// `STACKSEARCH_SETTINGS_PATH` wins; otherwise the working directory,
    /// `config/`, `/etc/stacksearch/`, and the user config dir are tried in
    /// that order. Environment overrides apply in every case.
    pub fn load() -> Result<Self> {
        let mut settings = match Self::discover() {
            Some(path) => {
                tracing::info!("Loading settings from: {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                tracing::info!("No settings file found, using defaults");
                Self::default()
            }
        };
        settings.merge_env();
        Ok(settings)
    }

    /// First existing settings file on the search path, if any.
    fn discover() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("STACKSEARCH_SETTINGS_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let candidates = [
            PathBuf::from("settings.yml"),
            PathBuf::from("config/settings.yml"),
            PathBuf::from("/etc/stacksearch/settings.yml"),
            dirs::config_dir()
                .map(|p| p.join("stacksearch-rs/settings.yml"))
                .unwrap_or_default(),
        ];

        candidates.into_iter().find(|path| path.exists())
    }

    /// Merge with environment variables (STACKSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("STACKSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("STACKSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("STACKSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("STACKSEARCH_BASE_URL") {
            self.server.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("STACKSEARCH_CATALOG_URL") {
            self.catalog.api_url = val;
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
    /// Contact URL shown in the footer
    pub contact_url: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "StackSearch".to_string(),
            contact_url: None,
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Base URL for the instance
    pub base_url: Option<String>,
    /// Public instance mode
    pub public_instance: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            base_url: None,
            public_instance: false,
        }
    }
}

/// Catalog API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Base URL of the catalog JSON API
    pub api_url: String,
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5050".to_string(),
            request_timeout: 10.0,
            verify_ssl: true,
        }
    }
}

/// Search page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Page sizes offered by the per-page widget
    pub per_page_options: Vec<u32>,
    /// Number of numbered links in the pagination widget
    pub page_window: u32,
    /// Collections fetched for the home page
    pub featured_collections: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            per_page_options: vec![10, 20, 50],
            page_window: 5,
            featured_collections: 4,
        }
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Enable the search response cache
    pub enabled: bool,
    /// Time to live for cached responses (seconds)
    pub ttl_seconds: u64,
    /// Maximum number of cached responses
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 300,
            max_capacity: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert!(!settings.general.debug);
        assert!(settings.cache.enabled);
        assert_eq!(settings.search.per_page_options, vec![10, 20, 50]);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let settings: Settings = serde_yaml::from_str(
            r#"
            server:
              port: 9000
            catalog:
              api_url: "https://catalog.example.org/v1"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(settings.catalog.api_url, "https://catalog.example.org/v1");
        assert_eq!(settings.cache.ttl_seconds, 300);
    }
}
