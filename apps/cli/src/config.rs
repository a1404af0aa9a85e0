//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/aula/config.toml`
//! - Windows: `%APPDATA%/aula/config.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Public deployment of the storage API.
pub const DEFAULT_ENDPOINT: &str = "https://tbk7w2ivb0.execute-api.us-east-2.amazonaws.com/dev/";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the storage API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Access key sent as `X-API-Key`. Empty until the user sets one.
    #[serde(default)]
    pub api_key: String,

    /// Category used when none is given on the command line.
    #[serde(default = "default_category")]
    pub category: String,

    /// Directory downloads are saved into.
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_category() -> String {
    aula_protocol::DEFAULT_CATEGORY.into()
}

fn default_download_dir() -> String {
    ".".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            category: default_category(),
            download_dir: default_download_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // The file may hold an API key.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Applies command-line values on top of the file values.
    pub fn apply_overrides(
        &mut self,
        endpoint: Option<String>,
        api_key: Option<String>,
        category: Option<String>,
    ) {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(api_key) = api_key {
            self.api_key = api_key;
        }
        if let Some(category) = category {
            self.category = category;
        }
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("aula").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("aula")
            .join("config.toml"))
    }
}
