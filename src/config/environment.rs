// ABOUTME: Environment-based configuration for database and logging
// ABOUTME: ServerConfig::from_env reads DATABASE_URL, pool size, log level and log format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Default `SQLite` database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/programs.db";

/// Default pool size for file-backed databases
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default tracing filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line human-readable output
    #[default]
    Pretty,
    /// Single-line human-readable output
    Compact,
    /// Structured JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(AppError::config(format!(
                "Invalid LOG_FORMAT '{other}', expected pretty, compact or json"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL
    pub url: String,
    /// Maximum pooled connections (in-memory databases always use one)
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
            format: LogFormat::default(),
        }
    }
}

/// Process-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Database settings
    pub database: DatabaseConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// - `DATABASE_URL` (default `sqlite:./data/programs.db`)
    /// - `PIERRE_DB_MAX_CONNECTIONS` (default 5)
    /// - `LOG_LEVEL` (default `info`; `RUST_LOG` still overrides at runtime)
    /// - `LOG_FORMAT` (`pretty`, `compact` or `json`)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a value is set but cannot be parsed
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let max_connections = match lookup("PIERRE_DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                AppError::config(format!(
                    "Invalid PIERRE_DB_MAX_CONNECTIONS '{raw}', expected a positive integer"
                ))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let level = lookup("LOG_LEVEL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());

        let format = lookup("LOG_FORMAT")
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            database: DatabaseConfig {
                url,
                max_connections,
            },
            logging: LoggingConfig { level, format },
        })
    }
}
