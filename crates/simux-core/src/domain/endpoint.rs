//! The remote endpoint the client connects to.
//!
//! An [`Endpoint`] is validated once, at start-up, so that the bootstrap code
//! can assume a non-empty host and a usable port.  Resolution of the host name
//! happens later, in the infrastructure layer.

use std::fmt;

use thiserror::Error;

/// Validation failures for a host/port pair.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The host name was empty or only whitespace.
    #[error("host must not be empty")]
    EmptyHost,

    /// Port 0 cannot be connected to.
    #[error("port must be in the range 1-65535")]
    ZeroPort,
}

/// A validated `(host, port)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Builds an endpoint from a host name (or IP literal) and a port.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::EmptyHost`] if `host` is blank and
    /// [`EndpointError::ZeroPort`] if `port` is `0`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use simux_core::Endpoint;
    ///
    /// let ep = Endpoint::new("localhost", 7000).unwrap();
    /// assert_eq!(ep.to_string(), "localhost:7000");
    /// ```
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, EndpointError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(EndpointError::EmptyHost);
        }
        if port == 0 {
            return Err(EndpointError::ZeroPort);
        }
        Ok(Self { host, port })
    }

    /// The host name or IP literal, as given by the operator.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
