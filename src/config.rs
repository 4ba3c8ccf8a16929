use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::{DEFAULT_NEO_API_BASE_URL, DEFAULT_PORT, DEFAULT_TIMEOUT_SECONDS};
use crate::error::{NeoError, Result};

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub neo_api: NeoApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Clone, Deserialize)]
pub struct NeoApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Usually supplied through `NASA_API_KEY` rather than the file
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_base_url() -> String {
    DEFAULT_NEO_API_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for NeoApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

// Keep the credential out of logs
impl fmt::Debug for NeoApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeoApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl NeoApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| NeoError::Config("NASA_API_KEY is not set".to_string()))
    }
}

impl Config {
    /// Load `.env`, then `config.toml` if present, then environment overrides.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = if Path::new(CONFIG_PATH).exists() {
            Self::from_file(CONFIG_PATH)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            NeoError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("NASA_API_KEY") {
            self.neo_api.api_key = Some(key);
        }
        if let Some(url) = lookup("NEO_API_BASE_URL") {
            self.neo_api.base_url = url;
        }
        if let Some(secs) = lookup("NEO_TIMEOUT_SECONDS") {
            self.neo_api.timeout_seconds = secs
                .parse()
                .map_err(|e| NeoError::Config(format!("Invalid NEO_TIMEOUT_SECONDS '{}': {}", secs, e)))?;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| NeoError::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.neo_api.require_api_key()?;
        if self.neo_api.timeout_seconds == 0 {
            return Err(NeoError::Config("timeout_seconds must be greater than zero".to_string()));
        }
        Ok(())
    }
}
