//! Configuration module for perdiem.
//!
//! Structured configuration loading from environment variables, organized
//! by concern: data file locations and engine tuning.

mod data_config;
mod engine_config;

pub use data_config::DataConfig;
pub use engine_config::EngineConfig;

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub data: DataConfig,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data: DataConfig::from_env()?,
            engine: EngineConfig::from_env()?,
        })
    }
}

/// Reads an environment variable and parses it, falling back to a default
/// when the variable is unset. A set-but-unparsable value is an error, not
/// a silent default.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        Err(_) => Ok(default),
    }
}
