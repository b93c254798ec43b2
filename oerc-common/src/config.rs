//! Configuration loading
//!
//! Every value resolves independently in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error. Missing backend credentials are not
//! an error either: the site starts in degraded mode and serves demo data.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::{Error, Result};

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:5780";

/// Default object storage bucket for papers and cover images
pub const DEFAULT_BUCKET: &str = "research-papers";

pub const ENV_CONFIG: &str = "OERC_CONFIG";
pub const ENV_BIND: &str = "OERC_BIND";
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

const DEFAULT_SEARCH_DELAY_MS: u64 = 1500;
const DEFAULT_SUMMARY_DELAY_MS: u64 = 1000;
const DEFAULT_CHAT_DELAY_MS: u64 = 1000;
const DEFAULT_CHECKOUT_DELAY_MS: u64 = 2000;
const DEFAULT_VISITOR_IDLE_SECS: u64 = 2 * 60 * 60;

/// On-disk configuration; every field optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub bucket: Option<String>,
    pub search_delay_ms: Option<u64>,
    pub summary_delay_ms: Option<u64>,
    pub chat_delay_ms: Option<u64>,
    pub checkout_delay_ms: Option<u64>,
    pub visitor_idle_secs: Option<u64>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

/// Hosted backend endpoint and key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub bucket: String,
}

impl BackendConfig {
    /// Backend URL (without trailing slash) and key, if both are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.url.as_deref(), self.anon_key.as_deref()) {
            (Some(url), Some(key)) => Some((url.trim_end_matches('/'), key)),
            _ => None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

/// Simulated latencies of the mock services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub search: Duration,
    pub summary: Duration,
    pub chat: Duration,
    pub checkout: Duration,
}

impl Latency {
    /// No artificial delay anywhere
    pub fn none() -> Self {
        Self {
            search: Duration::ZERO,
            summary: Duration::ZERO,
            chat: Duration::ZERO,
            checkout: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            search: Duration::from_millis(DEFAULT_SEARCH_DELAY_MS),
            summary: Duration::from_millis(DEFAULT_SUMMARY_DELAY_MS),
            chat: Duration::from_millis(DEFAULT_CHAT_DELAY_MS),
            checkout: Duration::from_millis(DEFAULT_CHECKOUT_DELAY_MS),
        }
    }
}

/// Fully resolved site configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub bind: String,
    pub backend: BackendConfig,
    pub latency: Latency,
    /// Visitors idle longer than this are dropped
    pub visitor_idle: Duration,
}

impl SiteConfig {
    /// Resolve configuration from CLI, environment, config file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let toml = match config_file_path(cli.config_path.as_deref()) {
            Some(path) => load_toml(&path)?,
            None => TomlConfig::default(),
        };
        Ok(Self::from_sources(cli, &toml))
    }

    /// Merge already-loaded sources; environment is read here
    pub fn from_sources(cli: &CliOverrides, toml: &TomlConfig) -> Self {
        let bind =
            pick(&cli.bind, ENV_BIND, &toml.bind).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let url = pick(&cli.supabase_url, ENV_SUPABASE_URL, &toml.supabase_url);
        let anon_key = pick(&cli.supabase_anon_key, ENV_SUPABASE_ANON_KEY, &toml.supabase_anon_key);
        let bucket = non_empty(&toml.bucket).unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        let ms = |v: Option<u64>, default: u64| Duration::from_millis(v.unwrap_or(default));
        let latency = Latency {
            search: ms(toml.search_delay_ms, DEFAULT_SEARCH_DELAY_MS),
            summary: ms(toml.summary_delay_ms, DEFAULT_SUMMARY_DELAY_MS),
            chat: ms(toml.chat_delay_ms, DEFAULT_CHAT_DELAY_MS),
            checkout: ms(toml.checkout_delay_ms, DEFAULT_CHECKOUT_DELAY_MS),
        };

        Self {
            bind,
            backend: BackendConfig {
                url,
                anon_key,
                bucket,
            },
            latency,
            visitor_idle: Duration::from_secs(
                toml.visitor_idle_secs.unwrap_or(DEFAULT_VISITOR_IDLE_SECS),
            ),
        }
    }
}

/// Locate the config file: explicit path, then `OERC_CONFIG`, then the
/// platform config directory (`~/.config/oerc/config.toml` on Linux)
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var(ENV_CONFIG).ok().filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("oerc").join("config.toml"))
}

/// Read a TOML config file
///
/// A missing file yields the empty config with a warning; a file that exists
/// but does not parse is a configuration error.
pub fn load_toml(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn pick(cli: &Option<String>, env_name: &str, file: &Option<String>) -> Option<String> {
    non_empty(cli)
        .or_else(|| non_empty(&std::env::var(env_name).ok()))
        .or_else(|| non_empty(file))
}
