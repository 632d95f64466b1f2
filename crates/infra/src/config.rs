//! Configuration loading and representation.

use std::path::PathBuf;

use thiserror::Error;

use crate::query::{DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD};

pub const DEFAULT_DATABASE_PATH: &str = "farmacia.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be an integer (got '{value}')")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must not be negative (got {value})")]
    Negative { key: &'static str, value: i64 },
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file (`FARMACIA_DB`).
    pub database_path: PathBuf,
    /// Listen address (`BIND_ADDR`).
    pub bind_addr: String,
    /// Dashboard low-stock threshold (`LOW_STOCK_THRESHOLD`).
    pub low_stock_threshold: i64,
    /// Dashboard expiry window in days (`EXPIRY_WINDOW_DAYS`).
    pub expiry_window_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset or blank keys
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("FARMACIA_DB") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(raw) = get("LOW_STOCK_THRESHOLD") {
            config.low_stock_threshold = parse_non_negative("LOW_STOCK_THRESHOLD", &raw)?;
        }
        if let Some(raw) = get("EXPIRY_WINDOW_DAYS") {
            config.expiry_window_days = parse_non_negative("EXPIRY_WINDOW_DAYS", &raw)?;
        }

        Ok(config)
    }
}

fn parse_non_negative(key: &'static str, raw: &str) -> Result<i64, ConfigError> {
    let value: i64 = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })?;
    if value < 0 {
        return Err(ConfigError::Negative { key, value });
    }
    Ok(value)
}
