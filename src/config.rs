use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::sim::DEFAULT_PERIOD;


// one hour at the default rate
const DEFAULT_MAX_SAMPLES: usize = 3600;


#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("update_interval_ms must be greater than zero")]
    ZeroInterval,
}


/// Simulation settings, read from TOML. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub update_interval_ms: u64,
    /// Samples retained per series; 0 keeps everything.
    pub max_samples: usize,
    /// Fixed seed for a reproducible session.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            update_interval_ms: DEFAULT_PERIOD.as_millis() as u64,
            max_samples: DEFAULT_MAX_SAMPLES,
            seed: None,
        }
    }
}

/// Command line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub update_interval_ms: Option<u64>,
    pub max_samples: Option<usize>,
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Loads `path` if given, then applies `overrides`.
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Config::default(),
        };

        if let Some(ms) = overrides.update_interval_ms {
            config.update_interval_ms = ms;
        }
        if let Some(max) = overrides.max_samples {
            config.max_samples = max;
        }
        if overrides.seed.is_some() {
            config.seed = overrides.seed;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.update_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
