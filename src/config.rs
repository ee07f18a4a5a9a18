//! Configuration loading.
//!
//! Configuration is loaded from a TOML file with the following resolution order:
//! 1. explicit path (e.g. `--config <path>` on the CLI)
//! 2. `~/.scholargate/config.toml` (user)
//! 3. built-in defaults
//!
//! The project's public key is never read from the config file; it comes
//! from `SCHOLARGATE_ANON_KEY`, falling back to `SUPABASE_ANON_KEY`. The
//! project URL may be set in `[endpoint] base_url` or via `SUPABASE_URL`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::providers::edge_function::DEFAULT_FUNCTION;
use crate::usage::DEFAULT_DAILY_LIMIT;
use crate::{Result, ScholarGateError};

/// Environment variables consulted for the public key, in order.
const ANON_KEY_ENV_VARS: &[&str] = &["SCHOLARGATE_ANON_KEY", "SUPABASE_ANON_KEY"];

/// Environment variables consulted for the project URL, in order.
const BASE_URL_ENV_VARS: &[&str] = &["SCHOLARGATE_URL", "SUPABASE_URL"];

/// Gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the AI function lives.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Function name (default: `ai-study`).
    #[serde(default = "default_function")]
    pub function: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            function: default_function(),
        }
    }
}

fn default_function() -> String {
    DEFAULT_FUNCTION.to_string()
}

/// Quota parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    /// Free calls per day (default: 15).
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    /// Bonus uses granted per rewarded ad (default: 10).
    #[serde(default = "default_reward_amount")]
    pub reward_amount: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            reward_amount: default_reward_amount(),
        }
    }
}

fn default_daily_limit() -> u32 {
    DEFAULT_DAILY_LIMIT
}

fn default_reward_amount() -> u32 {
    10
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Remote call timeout in seconds (default: 15).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Capacity of the in-memory response layer (default: 1000).
    #[serde(default = "default_hot_entries")]
    pub hot_cache_entries: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            hot_cache_entries: default_hot_entries(),
        }
    }
}

impl LimitsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_timeout() -> u64 {
    15
}

fn default_hot_entries() -> u64 {
    crate::cache::response::DEFAULT_HOT_ENTRIES
}

/// Local persistence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON store file (default: platform data dir).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl GatewayConfig {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the user config is used if
    /// present, else defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ScholarGateError::Configuration(format!("Failed to parse config: {e}"))
        })
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScholarGateError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ScholarGateError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ScholarGateError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".scholargate").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }

    /// Project base URL from the config file, falling back to the environment.
    pub fn base_url(&self) -> Option<String> {
        self.endpoint
            .base_url
            .clone()
            .or_else(|| first_env(BASE_URL_ENV_VARS))
    }

    /// Public (anon) key from the environment.
    pub fn anon_key(&self) -> Option<String> {
        first_env(ANON_KEY_ENV_VARS)
    }
}

fn first_env(vars: &[&str]) -> Option<String> {
    vars.iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}
