/*!
common/src/lib.rs

Shared configuration types for Newschat.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file, with default + override merging
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder card image used when neither the search result nor the preview has one.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=800";

/// Backend API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the news backend, optionally with a path prefix
    /// (e.g. "http://localhost:8000" or "https://example.org/news-backend")
    pub base_url: String,
    pub search_path: String,
    pub preview_path: String,
    pub health_path: String,
    /// Transport timeout; unset means whatever the HTTP client does by default
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            search_path: "/api/news/search".to_string(),
            preview_path: "/api/news/preview".to_string(),
            health_path: "/health".to_string(),
            timeout_seconds: None,
            user_agent: "Newschat/0.1.0".to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve a configured path under `base_url`. A path prefix on the base
    /// (e.g. "http://host/backend") is kept: paths are appended, never rooted.
    pub fn endpoint(&self, path: &str) -> Result<url::Url> {
        let mut base = url::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid api.base_url: {}", self.base_url))?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        base.join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid endpoint path '{}' for {}", path, self.base_url))
    }
}

/// Fixed parameters sent with every search request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: u32,
    pub enrich: bool,
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            enrich: true,
            parallel: true,
        }
    }
}

/// Presentation fallbacks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub placeholder_image_url: String,
    pub description_excerpt_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            placeholder_image_url: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            description_excerpt_chars: 150,
        }
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// Missing files are skipped, so with neither present this yields `Config::default()`.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());
        for (path, role) in [(default_path, "default"), (override_path, "override")] {
            if let Some(val) = read_toml_layer(path, role).await? {
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

/// Parse one config layer; an absent or missing file yields `None`.
async fn read_toml_layer(path: Option<&Path>, role: &str) -> Result<Option<toml::Value>> {
    let Some(path) = path.filter(|p| p.exists()) else {
        return Ok(None);
    };
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {} config: {}", role, path.display()))?;
    let val = toml::from_str(&data).with_context(|| format!("Failed to parse {} configuration", role))?;
    Ok(Some(val))
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_string_with_partial_sections() {
        let toml = r#"
            [api]
            base_url = "http://news.local:9000"

            [search]
            max_results = 8
        "#;

        let cfg: Config = toml::from_str(toml).expect("parse config");
        assert_eq!(cfg.api.base_url, "http://news.local:9000");
        assert_eq!(cfg.api.search_path, "/api/news/search");
        assert_eq!(cfg.search.max_results, 8);
        assert!(cfg.search.enrich);
        assert!(cfg.search.parallel);
        assert_eq!(cfg.display.placeholder_image_url, DEFAULT_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn empty_config_is_valid() {
        let cfg: Config = toml::from_str("").expect("parse empty config");
        assert_eq!(cfg.search.max_results, 5);
        assert_eq!(cfg.display.description_excerpt_chars, 150);
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let api = ApiConfig::default();
        let url = api.endpoint(&api.preview_path).expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:8000/api/news/preview");

        let bad = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(bad.endpoint("/health").is_err());
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        for base_url in ["http://gateway.local/backend", "http://gateway.local/backend/"] {
            let api = ApiConfig {
                base_url: base_url.to_string(),
                ..ApiConfig::default()
            };
            let url = api.endpoint(&api.search_path).expect("endpoint");
            assert_eq!(url.as_str(), "http://gateway.local/backend/api/news/search");
        }
    }

    #[tokio::test]
    async fn malformed_override_names_the_layer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let override_path = dir.path().join("config.toml");
        tokio::fs::write(&override_path, "[api\nbase_url = ").await.expect("write override");

        let err = Config::load_with_defaults(None, Some(&override_path))
            .await
            .expect_err("broken override must fail");
        assert!(format!("{:#}", err).contains("Failed to parse override configuration"));
    }

    #[tokio::test]
    async fn override_file_wins_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let override_path = dir.path().join("config.toml");

        tokio::fs::write(
            &default_path,
            "[api]\nbase_url = \"http://localhost:8000\"\ntimeout_seconds = 20\n\n[search]\nenrich = true\n",
        )
        .await
        .expect("write default");
        tokio::fs::write(&override_path, "[api]\nbase_url = \"http://10.0.0.2:8000\"\n\n[search]\nenrich = false\n")
            .await
            .expect("write override");

        let cfg = Config::load_with_defaults(Some(&default_path), Some(&override_path))
            .await
            .expect("load config");

        assert_eq!(cfg.api.base_url, "http://10.0.0.2:8000");
        // untouched keys from the default file survive the merge
        assert_eq!(cfg.api.timeout_seconds, Some(20));
        assert!(!cfg.search.enrich);
    }

    #[tokio::test]
    async fn missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");

        let cfg = Config::load_with_defaults(Some(&missing), None)
            .await
            .expect("load config");
        assert_eq!(cfg.api.base_url, "http://localhost:8000");
    }
}
