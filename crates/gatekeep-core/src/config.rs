//! Application configuration management.
//!
//! Holds the knobs of the simulated backend (token lifetime, latency) and of
//! the expiry watchdog, plus the last email used to log in.
//!
//! Configuration is stored at `~/.config/gatekeep/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "gatekeep";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Issued tokens live for two hours.
const DEFAULT_TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

/// Simulated network round trip for the fake backend.
const DEFAULT_LATENCY_MS: u64 = 300;

/// The watchdog fires this long after the token's expiry instant.
const DEFAULT_EXPIRY_GRACE_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token_ttl_secs: i64,
    pub latency_ms: u64,
    pub expiry_grace_ms: u64,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            latency_ms: DEFAULT_LATENCY_MS,
            expiry_grace_ms: DEFAULT_EXPIRY_GRACE_MS,
            last_email: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Token lifetime; values chrono cannot represent fall back to the default.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.token_ttl_secs).unwrap_or_else(|| {
            warn!(token_ttl_secs = self.token_ttl_secs, "Token TTL out of range, using default");
            chrono::Duration::seconds(DEFAULT_TOKEN_TTL_SECS)
        })
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn expiry_grace(&self) -> Duration {
        Duration::from_millis(self.expiry_grace_ms)
    }
}
