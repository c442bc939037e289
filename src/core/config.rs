use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::utils::logger::ScanLogger;

pub const DEFAULT_LEAKCHECK_API_URL: &str = "https://leakcheck.io/api/public";
pub const DEFAULT_OUTPUT_DIR: &str = "./reports";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Files checked, in order, for a TOML config before environment overrides apply
pub const CONFIG_PATHS: &[&str] = &["config/default.toml", "recon_hunter.toml", ".recon_hunter.toml"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub leakcheck_api_key: Option<String>,
    pub leakcheck_api_url: String,
    pub output_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            leakcheck_api_key: None,
            leakcheck_api_url: DEFAULT_LEAKCHECK_API_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Defaults, then the first readable config file, then the process environment.
    pub fn load() -> Self {
        let _ = dotenv::dotenv();

        let base = CONFIG_PATHS
            .iter()
            .map(Path::new)
            .filter(|path| path.exists())
            .find_map(|path| Self::from_file(path))
            .unwrap_or_default();

        base.with_lookup(|name| std::env::var(name).ok())
    }

    /// Environment only, on top of the defaults.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::default().with_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_lookup(lookup)
    }

    fn from_file(path: &Path) -> Option<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse config from {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read config from {}: {}", path.display(), e);
                None
            }
        }
    }

    fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty("LEAKCHECK_API_KEY") {
            self.leakcheck_api_key = Some(key);
        }
        if let Some(url) = non_empty("LEAKCHECK_API_URL") {
            self.leakcheck_api_url = url;
        }
        if let Some(dir) = non_empty("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = non_empty("TIMEOUT") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => warn!(
                    "Invalid TIMEOUT value '{}', using {} seconds",
                    raw, self.timeout_secs
                ),
            }
        }

        self
    }

    /// Timeout applied to breach lookups. Zero would disable the transport
    /// timeout, so it falls back to the default.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.leakcheck_api_key.is_some()
    }

    /// Warn about settings that degrade functionality. Never fails.
    pub fn validate(&self, logger: &dyn ScanLogger) {
        if !self.has_api_key() {
            logger.warning("LeakCheck API key is missing. Breach lookups may fail.");
        }
        if self.timeout_secs == 0 {
            logger.warning(&format!(
                "Timeout of 0 seconds is not allowed, using {} seconds",
                DEFAULT_TIMEOUT_SECS
            ));
        }
    }
}
