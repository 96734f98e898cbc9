//! Configuration loading for the `scamguard` CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.scamguard/config.toml` (user)
//! 3. `/etc/scamguard/config.toml` (system)
//! 4. built-in defaults
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.scamguard/secrets.toml` (user, must be 0600)
//! 2. `/etc/scamguard/secrets.toml` (system, must be 0600)
//! 3. `GOOGLE_GENAI_API_KEY`, then `GOOGLE_API_KEY`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::providers::RetryConfig;
use crate::{Result, ScamGuardError};

/// Environment variables consulted for the Gemini key, in order.
pub const GOOGLE_ENV_VARS: &[&str] = &["GOOGLE_GENAI_API_KEY", "GOOGLE_API_KEY"];

const APP_DIR: &str = ".scamguard";
const SYSTEM_DIR: &str = "/etc/scamguard";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

/// Gemini upstream settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamConfig {
    /// Set to false to always use the rule classifier.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

/// Retry settings for upstream requests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: true,
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.max_attempts)
            .initial_delay(Duration::from_millis(self.initial_delay_ms))
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .jitter(self.jitter)
    }
}

/// Response cache settings. Only useful within one process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_entries: default_cache_entries(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_entries() -> u64 {
    1_000
}

fn default_cache_ttl() -> u64 {
    3600
}

impl CacheSettings {
    /// `None` when the cache is disabled.
    pub fn to_cache_config(&self) -> Option<CacheConfig> {
        self.enabled.then(|| {
            CacheConfig::new()
                .max_entries(self.max_entries)
                .ttl(Duration::from_secs(self.ttl_secs))
        })
    }
}

/// History log settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistorySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Defaults to `~/.scamguard/history.jsonl`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl HistorySettings {
    /// Configured path, else the per-user default.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(APP_DIR).join("history.jsonl")))
    }
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub google: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl std::fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeySecret")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first file found is
    /// used, and defaults apply when there is none.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScamGuardError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ScamGuardError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ScamGuardError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(APP_DIR).join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = Path::new(SYSTEM_DIR).join("config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(APP_DIR).join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = Path::new(SYSTEM_DIR).join("secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            ScamGuardError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ScamGuardError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            ScamGuardError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(ScamGuardError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Gemini key from the secrets file, falling back to the environment.
    pub fn google_api_key(&self) -> Option<String> {
        self.google_api_key_with(|name| std::env::var(name).ok())
    }

    /// Like [`google_api_key`](Self::google_api_key) with an injectable
    /// environment lookup.
    pub fn google_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.google
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| GOOGLE_ENV_VARS.iter().find_map(|name| env(name)))
    }
}
