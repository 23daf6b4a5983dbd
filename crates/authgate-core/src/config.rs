//! Application configuration management.
//!
//! The gate needs the Supabase project URL and its public anon key. Both are
//! read from the environment (`SUPABASE_URL`, `SUPABASE_ANON_KEY`), falling
//! back to the `VITE_`-prefixed names so the web app's `.env` file can be
//! shared as-is.
//!
//! Sessions are never persisted; there is no config file.

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

/// Default HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "VITE_SUPABASE_URL"];
const ANON_KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];
const TIMEOUT_VAR: &str = "AUTHGATE_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub supabase_url: String,
    pub anon_key: String,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let url = first_env(&URL_VARS);
        let key = first_env(&ANON_KEY_VARS);

        let mut config = Self::from_values(url, key)?;

        if let Ok(raw) = std::env::var(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid {}", TIMEOUT_VAR),
            }
        }

        debug!(url = %config.supabase_url, "Config loaded");
        Ok(config)
    }

    /// Build a config from explicit values, applying the same validation as
    /// [`Config::from_env`].
    pub fn from_values(url: Option<String>, anon_key: Option<String>) -> Result<Self> {
        let url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        let anon_key = anon_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let (Some(url), Some(anon_key)) = (url, anon_key) else {
            return Err(anyhow!("Missing Supabase environment variables"));
        };

        if !url.starts_with("http") {
            warn!(url = %url, "Supabase URL should start with http:// or https://");
        }

        Ok(Self {
            supabase_url: url.trim_end_matches('/').to_string(),
            anon_key,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        })
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
}

// ============================================================================
// Tests
// ============================================================================
