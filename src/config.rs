//! Encoder configuration
//!
//! Loaded from a JSON file. Every key is optional:
//!
//! ```json
//! {
//!   "validate_separators": true,
//!   "reject_delimiter_in_names": true,
//!   "trace_registrations": false
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// Config file could not be read
    ReadFailed,
    /// Config file is not valid JSON for `EncoderConfig`
    InvalidJson,
}

impl ConfigErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ReadFailed => "MESH_CONFIG_READ_FAILED",
            Self::InvalidJson => "MESH_CONFIG_INVALID_JSON",
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
}

impl ConfigError {
    fn new(code: ConfigErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Behaviour switches for the field encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncoderConfig {
    /// Reject separator lists whose length is not 0, 1 or nesting
    #[serde(default = "default_true")]
    pub validate_separators: bool,

    /// Reject field names containing the key delimiter `@`
    #[serde(default = "default_true")]
    pub reject_delimiter_in_names: bool,

    /// Log a TRACE line for every field registration
    #[serde(default)]
    pub trace_registrations: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            validate_separators: true,
            reject_delimiter_in_names: true,
            trace_registrations: false,
        }
    }
}

impl EncoderConfig {
    /// Configuration that performs only the checks every reader relies on:
    /// nesting, suffix type and suffix count.
    pub fn permissive() -> Self {
        Self {
            validate_separators: false,
            reject_delimiter_in_names: false,
            trace_registrations: false,
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                ConfigErrorCode::ReadFailed,
                format!("Failed to read config {}: {}", path.display(), e),
            )
        })?;

        let config = Self::from_json(&content)?;

        let location = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", location.as_str())]);

        Ok(config)
    }

    /// Parse configuration from JSON text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| {
            ConfigError::new(
                ConfigErrorCode::InvalidJson,
                format!("Invalid config JSON: {}", e),
            )
        })
    }
}
