//! Session bootstrap: resolve the endpoint and open one TCP connection.
//!
//! This runs exactly once per process.  There is no retry, no backoff and no
//! fallback to a second resolved address; the operator re-runs the program
//! if the first attempt fails.

use std::io;
use std::net::SocketAddr;

use simux_core::Endpoint;
use thiserror::Error;
use tokio::net::{lookup_host, TcpStream};
use tracing::{debug, info};

/// Failures while establishing the connection.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The resolver returned an error for the host name.
    #[error("resolve {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// The resolver succeeded but returned no addresses.
    #[error("resolve {endpoint}: no addresses found")]
    NoAddress { endpoint: String },

    /// The TCP handshake failed (refused, unreachable, timed out).
    #[error("connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Resolves `endpoint` and returns the first address.
///
/// # Errors
///
/// Returns [`BootstrapError::Resolve`] or [`BootstrapError::NoAddress`].
pub async fn resolve(endpoint: &Endpoint) -> Result<SocketAddr, BootstrapError> {
    let mut addrs = lookup_host((endpoint.host(), endpoint.port()))
        .await
        .map_err(|source| BootstrapError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })?;

    let addr = addrs.next().ok_or_else(|| BootstrapError::NoAddress {
        endpoint: endpoint.to_string(),
    })?;
    debug!("{endpoint} resolved to {addr}");
    Ok(addr)
}

/// Opens the session connection to `endpoint`.
///
/// # Errors
///
/// Returns a [`BootstrapError`] describing whether resolution or the TCP
/// connect failed.
///
/// # Example
///
/// ```no_run
/// use simux::infrastructure::bootstrap::connect;
/// use simux_core::Endpoint;
///
/// # async fn example() -> Result<(), simux::infrastructure::bootstrap::BootstrapError> {
/// let endpoint = Endpoint::new("127.0.0.1", 7000).unwrap();
/// let stream = connect(&endpoint).await?;
/// # Ok(())
/// # }
/// ```
pub async fn connect(endpoint: &Endpoint) -> Result<TcpStream, BootstrapError> {
    let addr = resolve(endpoint).await?;
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| BootstrapError::Connect { addr, source })?;

    info!("connected to {endpoint} ({addr})");
    Ok(stream)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_resolve_ip_literal_without_dns() {
        // Arrange
        let endpoint = Endpoint::new("127.0.0.1", 4000).unwrap();

        // Act
        let addr = resolve(&endpoint).await.unwrap();

        // Assert
        assert_eq!(addr, "127.0.0.1:4000".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_connect_to_listening_server() {
        // Arrange
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let endpoint = Endpoint::new("127.0.0.1", port).unwrap();

        // Act
        let (stream, accepted) = tokio::join!(connect(&endpoint), listener.accept());

        // Assert
        let stream = stream.unwrap();
        let (_, peer) = accepted.unwrap();
        assert_eq!(stream.local_addr().unwrap(), peer);
    }

    #[tokio::test]
    async fn test_connect_refused_reports_connect_error() {
        // Arrange: grab a free port, then release it so nothing listens there.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let endpoint = Endpoint::new("127.0.0.1", port).unwrap();

        // Act
        let err = connect(&endpoint).await.unwrap_err();

        // Assert
        match err {
            BootstrapError::Connect { addr, ref source } => {
                assert_eq!(addr.port(), port);
                assert_eq!(source.kind(), io::ErrorKind::ConnectionRefused);
            }
            other => panic!("expected Connect error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("connect to 127.0.0.1:"));
    }

    #[test]
    fn test_resolve_error_message_names_the_operation() {
        let err = BootstrapError::Resolve {
            endpoint: "nowhere.invalid:23".to_string(),
            source: io::Error::new(io::ErrorKind::Other, "Name or service not known"),
        };
        assert_eq!(
            err.to_string(),
            "resolve nowhere.invalid:23: Name or service not known"
        );
    }

    #[test]
    fn test_no_address_message() {
        let err = BootstrapError::NoAddress {
            endpoint: "empty.example:23".to_string(),
        };
        assert_eq!(err.to_string(), "resolve empty.example:23: no addresses found");
    }
}
