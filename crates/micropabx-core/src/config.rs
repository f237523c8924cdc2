// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Default artifact destination.
pub const DEFAULT_EXTENSIONS_CONF: &str = "/etc/asterisk/extensions.conf";

/// Default bound on store connect and reads, in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Micropabx reload configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL of the rule store
    pub database_url: String,
    /// Where the generated dialplan is written
    pub extensions_conf: PathBuf,
    /// Comma-separated licensed modules (recording policy input)
    pub modules: String,
    /// Bound on store connect and each read
    pub store_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `MICROPABX_DATABASE_URL`: SQLite connection string
    ///
    /// Optional (with defaults):
    /// - `MICROPABX_EXTENSIONS_CONF`: artifact path (default: /etc/asterisk/extensions.conf)
    /// - `MICROPABX_MODULES`: licensed modules (default: empty)
    /// - `MICROPABX_STORE_TIMEOUT_SECS`: store timeout (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Lets callers layer command-line overrides over the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("MICROPABX_DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("MICROPABX_DATABASE_URL"))?;

        let extensions_conf = PathBuf::from(
            lookup("MICROPABX_EXTENSIONS_CONF")
                .unwrap_or_else(|| DEFAULT_EXTENSIONS_CONF.to_string()),
        );

        let modules = lookup("MICROPABX_MODULES").unwrap_or_default();

        let store_timeout_secs: u64 = lookup("MICROPABX_STORE_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_STORE_TIMEOUT_SECS.to_string())
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::Invalid(
                "MICROPABX_STORE_TIMEOUT_SECS",
                "must be a positive integer",
            ))?;

        Ok(Self {
            database_url,
            extensions_conf,
            modules,
            store_timeout: Duration::from_secs(store_timeout_secs),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
