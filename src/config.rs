// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the Grover search service.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config.yaml file
//! 3. Environment variables (QUBITOS_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::amplitude::{EngineKind, DEFAULT_MAX_SIZE};
use crate::error::{Error, Result};
use crate::search::GroverSearch;

/// Largest configurable search space; the segment tree allocates `4N` nodes.
pub const MAX_SEARCH_SPACE_SIZE_LIMIT: usize = usize::MAX / 4;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Amplitude engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        // Load from file if specified
        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            // Try default locations
            for path in &["config.yaml", "config.yml", "/etc/qubitos/grover.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("QUBITOS_GROVER_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("QUBITOS_GROVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("QUBITOS_GROVER_ENGINE") {
            match val.parse() {
                Ok(kind) => self.engine.kind = kind,
                Err(e) => tracing::warn!(error = %e, "Ignoring QUBITOS_GROVER_ENGINE"),
            }
        }
        if let Some(val) = lookup("QUBITOS_GROVER_MAX_SEARCH_SPACE_SIZE") {
            if let Ok(max) = val.parse() {
                self.engine.max_search_space_size = max;
            }
        }
        if let Some(val) = lookup("QUBITOS_GROVER_MAX_CONCURRENT_SEARCHES") {
            if let Ok(max) = val.parse() {
                self.server.max_concurrent_searches = max;
            }
        }
        if let Some(val) = lookup("QUBITOS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("QUBITOS_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Some(val) = lookup("QUBITOS_CORS_ALLOW_ALL") {
            self.server.cors.allow_all = val.to_lowercase() == "true" || val == "1";
        }
        if let Some(val) = lookup("QUBITOS_CORS_ALLOWED_ORIGINS") {
            self.server.cors.allowed_origins =
                val.split(',').map(|s| s.trim().to_string()).collect();
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("REST port cannot be 0".into()));
        }
        if self.engine.max_search_space_size == 0 {
            return Err(Error::Config(
                "max_search_space_size must be greater than 0".into(),
            ));
        }
        if i64::try_from(self.engine.max_search_space_size).is_err() {
            return Err(Error::Config(
                "max_search_space_size does not fit in a signed 64-bit integer".into(),
            ));
        }
        if self.engine.max_search_space_size > MAX_SEARCH_SPACE_SIZE_LIMIT {
            return Err(Error::Config(format!(
                "max_search_space_size must be at most {}",
                MAX_SEARCH_SPACE_SIZE_LIMIT
            )));
        }
        if self.server.max_concurrent_searches == 0 {
            return Err(Error::Config(
                "max_concurrent_searches must be greater than 0".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(Error::Config(format!(
                "Unknown log format '{}' (expected json or pretty)",
                self.logging.format
            )));
        }
        // Warn about CORS allow_all in non-development mode
        if self.server.cors.allow_all {
            tracing::warn!(
                "CORS is set to allow all origins. This is insecure for production use. \
                 Set QUBITOS_CORS_ALLOW_ALL=false or configure specific origins."
            );
        }
        Ok(())
    }

    /// Search orchestrator described by the engine section.
    pub fn search(&self) -> GroverSearch {
        GroverSearch::with_max_size(self.engine.kind, self.engine.max_search_space_size)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// REST port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Graceful shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_sec: u64,

    /// Searches allowed to run at once. A segment-tree search holds
    /// `4 * 24` bytes per amplitude, about 96 MB at 10^6, so peak engine
    /// memory is roughly this value times that.
    #[serde(default = "default_max_concurrent_searches")]
    pub max_concurrent_searches: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: CorsConfig::default(),
            shutdown_timeout_sec: default_shutdown_timeout(),
            max_concurrent_searches: default_max_concurrent_searches(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allow all origins (INSECURE - for development only)
    #[serde(default)]
    pub allow_all: bool,

    /// Allowed origins when allow_all is false
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            // Default to NOT allowing all origins for security
            allow_all: false,
            allowed_origins: vec![
                "http://localhost:3000".into(),
                "http://127.0.0.1:3000".into(),
            ],
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_max_concurrent_searches() -> usize {
    4
}

/// Amplitude engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Backing structure for amplitude vectors
    #[serde(default)]
    pub kind: EngineKind,

    /// Largest search space a single request may allocate
    #[serde(default = "default_max_search_space_size")]
    pub max_search_space_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            max_search_space_size: default_max_search_space_size(),
        }
    }
}

fn default_max_search_space_size() -> usize {
    DEFAULT_MAX_SIZE
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}
