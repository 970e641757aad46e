use crate::params::TimeFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.amberdata.com";

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Fixed per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable consulted for the API key when none is configured.
pub const API_KEY_ENV: &str = "AMBERDATA_API_KEY";

// ---------------------------------------------------------------------------
// Client Configuration
// ---------------------------------------------------------------------------

/// Immutable settings a client is built from.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
}

impl ClientConfig {
    /// Configuration targeting the production API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root (proxy, mock server).
    /// Trailing slashes are stripped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Settings File
// ---------------------------------------------------------------------------

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("No API key configured (set {} or api_key in the settings file)", API_KEY_ENV)]
    MissingApiKey,
}

/// Optional on-disk settings, e.g. `~/.config/amberdata.toml`:
///
/// ```toml
/// api_key = "..."
/// base_url = "https://api.amberdata.com"
/// time_format = "iso"
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Applied to every request that does not set `timeFormat` itself.
    pub time_format: Option<TimeFormat>,
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Layer `other` on top of `self`: any field set in `other` wins.
    pub fn overlay(self, other: Settings) -> Settings {
        Settings {
            api_key: other.api_key.or(self.api_key),
            base_url: other.base_url.or(self.base_url),
            time_format: other.time_format.or(self.time_format),
        }
    }

    /// Build a client configuration, failing if no API key is known.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let config = ClientConfig::new(api_key);
        Ok(match &self.base_url {
            Some(url) => config.with_base_url(url.as_str()),
            None => config,
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("time_format", &self.time_format)
            .finish()
    }
}
