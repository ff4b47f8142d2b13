use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

// =============================================================================
// Defaults
// =============================================================================

/// Base URL of a local CMS instance
pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

/// Timeout for a single request in milliseconds (30 seconds)
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Placeholder replaced by the version id in action endpoints
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Environment variable overriding `api.token`
pub const TOKEN_ENV: &str = "DOC_VERSIONS_TOKEN";

const APP_NAME: &str = "doc-versions";

/// Top-level configuration file structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminConfig {
    pub api: ApiConfig,
    pub viewer: ViewerConfig,
}

/// Documentation service connection settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    /// Admin API token sent as a bearer token
    pub token: Option<String>,
    pub timeout_ms: u64,
    pub endpoints: EndpointsConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_ms: REQUEST_TIMEOUT_MS,
            endpoints: EndpointsConfig::default(),
        }
    }
}

/// Endpoint paths relative to `baseUrl`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointsConfig {
    pub versions: String,
    pub regenerate: String,
    pub delete: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            versions: "/documentation/versions".to_string(),
            regenerate: "/documentation/versions/{version}/regenerate".to_string(),
            delete: "/documentation/versions/{version}".to_string(),
        }
    }
}

/// Live documentation viewer settings
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Defaults to `api.baseUrl`
    pub base_url: Option<String>,
}

impl AdminConfig {
    /// Load the config file at `path`, or defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str::<AdminConfig>(&content)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        } else {
            AdminConfig::default()
        };

        if let Some(token) = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()) {
            config.api.token = Some(token);
        }

        Ok(config)
    }

    pub fn viewer_base_url(&self) -> &str {
        self.viewer
            .base_url
            .as_deref()
            .unwrap_or(&self.api.base_url)
            .trim_end_matches('/')
    }
}

/// Returns the path to the data directory for doc-versions.
/// Uses $XDG_DATA_HOME/doc-versions if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/doc-versions,
/// or ./doc-versions if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("doc-versions.log")
}

/// Returns the default config file path.
/// Uses $XDG_CONFIG_HOME/doc-versions/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/doc-versions/config.json.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
        .join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}
