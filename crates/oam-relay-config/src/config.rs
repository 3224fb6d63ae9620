// oam-relay-config/src/config.rs
// ============================================================================
// Module: OaM Relay Configuration
// Description: Configuration loading and validation for OaM Relay.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: oam-relay-records, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed; every section validates its
//! own ranges before the server starts serving.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use oam_relay_records::DEFAULT_SCROLL_KEEP_ALIVE_MS;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "oam-relay.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "OAM_RELAY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default maximum request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Maximum allowed request body size in bytes.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
/// Default automation queue capacity.
pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 256;
/// Maximum allowed automation queue capacity.
pub(crate) const MAX_QUEUE_CAPACITY: usize = 65_536;
/// Minimum allowed scroll keep-alive in milliseconds.
pub(crate) const MIN_SCROLL_KEEP_ALIVE_MS: u64 = 1_000;
/// Maximum allowed scroll keep-alive in milliseconds.
pub(crate) const MAX_SCROLL_KEEP_ALIVE_MS: u64 = 600_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// OaM Relay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OamRelayConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record query engine configuration.
    #[serde(default)]
    pub records: RecordsConfig,
    /// Automation worker configuration.
    #[serde(default)]
    pub automation: AutomationConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8420".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Record query engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Scroll-cursor keep-alive in milliseconds.
    #[serde(default = "default_scroll_keep_alive_ms")]
    pub scroll_keep_alive_ms: u64,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            scroll_keep_alive_ms: DEFAULT_SCROLL_KEEP_ALIVE_MS,
        }
    }
}

/// Automation worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// Bounded task queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Base URL of the automation execution service, absent for local mode.
    #[serde(default)]
    pub gateway: Option<String>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            gateway: None,
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditSinkType {
    /// JSON lines to stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Selected audit sink.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Audit log path, required for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Serde default for the maximum body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Serde default for the scroll keep-alive.
const fn default_scroll_keep_alive_ms() -> u64 {
    DEFAULT_SCROLL_KEEP_ALIVE_MS
}

/// Serde default for the automation queue capacity.
const fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

impl OamRelayConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.records.validate()?;
        self.automation.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    /// Validates server settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.is_empty() {
            return Err(ConfigError::Invalid("server.bind must be set".to_string()));
        }
        if self.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid("server.bind must be a socket address".to_string()));
        }
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between 1 and {MAX_MAX_BODY_BYTES}"
            )));
        }
        Ok(())
    }
}

impl RecordsConfig {
    /// Validates record engine settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll_keep_alive_ms < MIN_SCROLL_KEEP_ALIVE_MS
            || self.scroll_keep_alive_ms > MAX_SCROLL_KEEP_ALIVE_MS
        {
            return Err(ConfigError::Invalid(format!(
                "records.scroll_keep_alive_ms must be between {MIN_SCROLL_KEEP_ALIVE_MS} and \
                 {MAX_SCROLL_KEEP_ALIVE_MS}"
            )));
        }
        Ok(())
    }
}

impl AutomationConfig {
    /// Validates automation worker settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "automation.queue_capacity must be between 1 and {MAX_QUEUE_CAPACITY}"
            )));
        }
        if let Some(gateway) = &self.gateway
            && !gateway.starts_with("http://")
            && !gateway.starts_with("https://")
        {
            return Err(ConfigError::Invalid(
                "automation.gateway must be an http or https url".to_string(),
            ));
        }
        Ok(())
    }
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sink == AuditSinkType::File && self.path.is_none() {
            return Err(ConfigError::Invalid("audit.path required for the file sink".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the config path from the argument, env var, or default name.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(from_env) = env::var(CONFIG_ENV_VAR) {
        if from_env.is_empty() {
            return Err(ConfigError::Invalid(format!("{CONFIG_ENV_VAR} must not be empty")));
        }
        return Ok(PathBuf::from(from_env));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Rejects paths with oversized or traversing components.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds length limit".to_string()));
    }
    for component in path.components() {
        match component {
            Component::ParentDir => {
                return Err(ConfigError::Invalid(
                    "config path must not contain parent components".to_string(),
                ));
            }
            Component::Normal(part) if part.len() > MAX_PATH_COMPONENT_LENGTH => {
                return Err(ConfigError::Invalid(
                    "config path component exceeds length limit".to_string(),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}
