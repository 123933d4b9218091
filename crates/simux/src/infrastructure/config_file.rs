//! TOML configuration file.
//!
//! The file is optional.  When present it may set any subset of the session
//! settings; missing fields fall back to the built-in defaults:
//!
//! ```toml
//! [session]
//! log_file = "output.log"
//! history_file = "simux.history"
//! read_buffer_size = 2048
//! prompt = "simux> "
//! ```
//!
//! Command-line flags are applied on top of the loaded values in `main.rs`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::config::{
    SessionConfig, SessionConfigError, DEFAULT_HISTORY_FILE, DEFAULT_LOG_FILE,
    DEFAULT_PROMPT, DEFAULT_READ_BUFFER_SIZE,
};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but cannot be used.
    #[error("invalid config: {0}")]
    Invalid(#[from] SessionConfigError),
}

/// Top-level layout of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub session: SessionSection,
}

/// The `[session]` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionSection {
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}
fn default_history_file() -> PathBuf {
    PathBuf::from(DEFAULT_HISTORY_FILE)
}
fn default_read_buffer_size() -> usize {
    DEFAULT_READ_BUFFER_SIZE
}
fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            history_file: default_history_file(),
            read_buffer_size: default_read_buffer_size(),
            prompt: default_prompt(),
        }
    }
}

impl From<SessionSection> for SessionConfig {
    fn from(section: SessionSection) -> Self {
        Self {
            log_path: section.log_file,
            history_path: section.history_file,
            read_buffer_size: section.read_buffer_size,
            prompt: section.prompt,
        }
    }
}

/// Parses config text into a validated [`SessionConfig`].
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML and
/// [`ConfigError::Invalid`] for unusable values.
pub fn parse_config(content: &str) -> Result<SessionConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(content)?;
    let config = SessionConfig::from(file.session);
    config.validate()?;
    Ok(config)
}

/// Loads and validates the config file at `path`.
///
/// This file is only read when the operator names it, so a missing file is
/// an error.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_config`].
pub fn load_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
