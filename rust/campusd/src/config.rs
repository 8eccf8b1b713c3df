//! Runtime configuration.
//!
//! Loaded from (later sources override earlier):
//! 1. Default values
//! 2. An optional TOML file passed with `--config`
//! 3. Environment variables prefixed with `CAMPUSD_`

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const ENV_PREFIX: &str = "CAMPUSD_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `campus.sqlite3`. Attendance stays in memory when unset.
    pub workspace: Option<PathBuf>,
    /// Artificial delay before every store call, in milliseconds.
    pub latency_ms: u64,
    /// Start the stores with demo records.
    pub seed_demo_data: bool,
    /// Page size for newly opened list views.
    pub default_page_size: usize,
    /// Largest page size a client may ask for.
    pub max_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: None,
            latency_ms: 0,
            seed_demo_data: true,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl Config {
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "page sizes must be greater than 0".to_string(),
            });
        }
        if self.default_page_size > self.max_page_size {
            return Err(Error::ConfigValidation {
                message: format!(
                    "default_page_size ({}) cannot be greater than max_page_size ({})",
                    self.default_page_size, self.max_page_size
                ),
            });
        }
        Ok(())
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Clamp a requested page size into `1..=max_page_size`.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}
