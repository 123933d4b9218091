//! Session configuration.
//!
//! [`SessionConfig`] carries every setting the bridge and the prompt loop
//! need.  It is built once at start-up and passed in at construction, so
//! several independent sessions (for example in tests) can use different
//! log files and buffer sizes side by side.

use std::path::PathBuf;

use thiserror::Error;

/// Default file that receives every byte read from the server.
pub const DEFAULT_LOG_FILE: &str = "output.log";

/// Default file that persists the prompt history across runs.
pub const DEFAULT_HISTORY_FILE: &str = "simux.history";

/// Default upper bound for a single read from the connection.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 2048;

/// Default prompt text.
pub const DEFAULT_PROMPT: &str = "simux> ";

/// A setting that cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionConfigError {
    /// A zero-byte read buffer would make every read look like end-of-stream.
    #[error("read_buffer_size must be greater than zero")]
    ZeroReadBuffer,
}

/// All runtime settings for one client session.
///
/// # Example
///
/// ```rust
/// use simux::domain::SessionConfig;
///
/// let cfg = SessionConfig::default();
/// assert_eq!(cfg.read_buffer_size, 2048);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Append-only log of inbound server bytes.  Created if absent.
    pub log_path: PathBuf,

    /// Plain-text prompt history, one entry per line.
    pub history_path: PathBuf,

    /// Maximum number of bytes taken from the socket per wakeup.
    pub read_buffer_size: usize,

    /// Text shown in front of the operator's cursor.
    pub prompt: String,
}

impl SessionConfig {
    /// Checks the settings that would otherwise fail at run time.
    ///
    /// # Errors
    ///
    /// Returns [`SessionConfigError::ZeroReadBuffer`] if `read_buffer_size`
    /// is `0`.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        if self.read_buffer_size == 0 {
            return Err(SessionConfigError::ZeroReadBuffer);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    /// | Field            | Default          |
    /// |------------------|------------------|
    /// | log_path         | `output.log`     |
    /// | history_path     | `simux.history`  |
    /// | read_buffer_size | 2048             |
    /// | prompt           | `simux> `        |
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_relative_to_working_directory() {
        // Arrange / Act
        let cfg = SessionConfig::default();

        // Assert
        assert_eq!(cfg.log_path, PathBuf::from("output.log"));
        assert_eq!(cfg.history_path, PathBuf::from("simux.history"));
        assert!(cfg.log_path.is_relative());
    }

    #[test]
    fn test_default_prompt() {
        assert_eq!(SessionConfig::default().prompt, "simux> ");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_read_buffer_is_rejected() {
        // Arrange
        let cfg = SessionConfig {
            read_buffer_size: 0,
            ..SessionConfig::default()
        };

        // Act / Assert
        assert_eq!(cfg.validate(), Err(SessionConfigError::ZeroReadBuffer));
    }

    #[test]
    fn test_one_byte_read_buffer_is_accepted() {
        let cfg = SessionConfig {
            read_buffer_size: 1,
            ..SessionConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
