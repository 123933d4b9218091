//! The command/response bridge.
//!
//! [`Bridge`] owns the server connection, the log sink, and the receiving end
//! of the intake channel.  Its [`run`](Bridge::run) loop waits on two sources
//! at once and reacts to whichever is ready:
//!
//! ```text
//!            ┌──────────── wait (tokio::select!) ────────────┐
//!            ▼                                               ▼
//!   intake: Some(command)                          connection: read(n)
//!     write_all(command + "\n")                      n == 0  → RemoteClosed
//!     flush                                          n  > 0  → append to log, flush
//!   intake: None                                     error   → fatal
//!     shutdown(write side) → IntakeClosed            EINTR   → wait again
//! ```
//!
//! # Atomicity
//!
//! Each reaction runs to completion inside the loop body before the next
//! wait, so one command is always written in full (partial writes are looped
//! by `write_all`) before the next command is dequeued, and one inbound chunk
//! is always appended in full before the next read.  There is no ordering
//! between the two streams beyond the order in which readiness was observed.
//!
//! # Failure policy
//!
//! Every I/O failure ends the bridge with a [`BridgeError`] naming the
//! operation.  Nothing is retried except a read interrupted by a signal.

use std::io;

use simux_core::{encode_command, Command};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tracing::{debug, info};

use super::intake::IntakeReceiver;

/// A fatal I/O failure inside the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Sending a command to the server failed.
    #[error("write to connection: {0}")]
    WriteConnection(#[source] io::Error),

    /// Receiving from the server failed.
    #[error("read from connection: {0}")]
    ReadConnection(#[source] io::Error),

    /// Appending inbound bytes to the log sink failed.
    #[error("write to log: {0}")]
    WriteLog(#[source] io::Error),

    /// Closing the write side after the operator finished failed.
    #[error("shut down connection: {0}")]
    ShutdownConnection(#[source] io::Error),
}

/// Why the bridge stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed its side of the connection (zero-length read).
    RemoteClosed,
    /// The prompt loop dropped its intake sender (operator end-of-input).
    IntakeClosed,
}

/// Totals reported when the bridge stops cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeSummary {
    pub end: SessionEnd,
    /// Number of commands written to the connection.
    pub commands_forwarded: u64,
    /// Number of inbound bytes appended to the log sink.
    pub bytes_logged: u64,
}

/// Multiplexes operator commands and inbound server bytes.
///
/// `S` is the connection (a `TcpStream` in production, an in-memory duplex
/// in tests) and `L` is the log sink (an append-mode file in production).
pub struct Bridge<S, L> {
    reader: ReadHalf<S>,
    writer: WriteHalf<S>,
    log: L,
    intake: IntakeReceiver,
    read_buf: Vec<u8>,
    commands_forwarded: u64,
    bytes_logged: u64,
}

impl<S, L> Bridge<S, L>
where
    S: AsyncRead + AsyncWrite,
    L: AsyncWrite + Unpin,
{
    /// Takes ownership of `connection`, `log` and `intake`.
    ///
    /// `read_buffer_size` bounds a single read; a value of `0` is raised to `1`
    /// because a zero-length buffer cannot be told apart from end-of-stream.
    pub fn new(connection: S, log: L, intake: IntakeReceiver, read_buffer_size: usize) -> Self {
        let (reader, writer) = tokio::io::split(connection);
        Self {
            reader,
            writer,
            log,
            intake,
            read_buf: vec![0u8; read_buffer_size.max(1)],
            commands_forwarded: 0,
            bytes_logged: 0,
        }
    }

    /// Runs the event loop until the session ends or an I/O operation fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`BridgeError`] encountered.  The connection and the
    /// log sink stay owned by the bridge and are released when it is dropped.
    pub async fn run(&mut self) -> Result<BridgeSummary, BridgeError> {
        info!(buffer = self.read_buf.len(), "bridge running");

        loop {
            tokio::select! {
                command = self.intake.recv() => match command {
                    Some(command) => self.forward(command).await?,
                    None => {
                        self.writer
                            .shutdown()
                            .await
                            .map_err(BridgeError::ShutdownConnection)?;
                        return Ok(self.finish(SessionEnd::IntakeClosed));
                    }
                },
                read = self.reader.read(&mut self.read_buf) => match read {
                    Ok(0) => return Ok(self.finish(SessionEnd::RemoteClosed)),
                    Ok(n) => self.append_to_log(n).await?,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                        debug!("read interrupted; waiting again");
                    }
                    Err(e) => return Err(BridgeError::ReadConnection(e)),
                },
            }
        }
    }

    /// The log sink, for inspection after [`run`](Self::run) returns.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Writes one framed command.  The command is dropped on return.
    async fn forward(&mut self, command: Command) -> Result<(), BridgeError> {
        let payload = encode_command(&command);
        self.writer
            .write_all(&payload)
            .await
            .map_err(BridgeError::WriteConnection)?;
        self.writer
            .flush()
            .await
            .map_err(BridgeError::WriteConnection)?;

        self.commands_forwarded += 1;
        debug!(bytes = payload.len(), total = self.commands_forwarded, "forwarded command");
        Ok(())
    }

    /// Appends the first `n` bytes of the read buffer to the log, verbatim.
    async fn append_to_log(&mut self, n: usize) -> Result<(), BridgeError> {
        self.log
            .write_all(&self.read_buf[..n])
            .await
            .map_err(BridgeError::WriteLog)?;
        self.log.flush().await.map_err(BridgeError::WriteLog)?;

        self.bytes_logged += n as u64;
        debug!(bytes = n, total = self.bytes_logged, "logged inbound chunk");
        Ok(())
    }

    fn finish(&self, end: SessionEnd) -> BridgeSummary {
        let summary = BridgeSummary {
            end,
            commands_forwarded: self.commands_forwarded,
            bytes_logged: self.bytes_logged,
        };
        info!(?summary, "bridge stopped");
        summary
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::intake::{intake_channel, IntakeSender};
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

    fn bridge_over<S>(connection: S, read_buffer_size: usize) -> (IntakeSender, Bridge<S, Vec<u8>>)
    where
        S: AsyncRead + AsyncWrite,
    {
        let (tx, rx) = intake_channel();
        (tx, Bridge::new(connection, Vec::new(), rx, read_buffer_size))
    }

    async fn read_all(mut server: DuplexStream) -> Vec<u8> {
        let mut received = Vec::new();
        server.read_to_end(&mut received).await.unwrap();
        received
    }

    #[tokio::test]
    async fn test_single_command_is_sent_with_terminator_and_log_stays_empty() {
        // Arrange: the server has sent nothing yet.
        let (client, server) = tokio::io::duplex(1024);
        let (tx, mut bridge) = bridge_over(client, 2048);

        // Act
        tx.submit(Command::from("status")).unwrap();
        drop(tx);
        let summary = bridge.run().await.unwrap();

        // Assert
        assert_eq!(summary.end, SessionEnd::IntakeClosed);
        assert_eq!(summary.commands_forwarded, 1);
        assert!(bridge.log().is_empty());
        assert_eq!(read_all(server).await, b"status\n");
    }

    #[tokio::test]
    async fn test_inbound_bytes_are_logged_verbatim() {
        // Arrange: the server sends "OK\n" and closes.
        let (client, mut server) = tokio::io::duplex(1024);
        let (_tx, mut bridge) = bridge_over(client, 2048);
        server.write_all(b"OK\n").await.unwrap();
        drop(server);

        // Act
        let summary = bridge.run().await.unwrap();

        // Assert
        assert_eq!(summary.end, SessionEnd::RemoteClosed);
        assert_eq!(summary.bytes_logged, 3);
        assert_eq!(bridge.log().as_slice(), b"OK\n");
    }

    #[tokio::test]
    async fn test_commands_are_forwarded_in_entry_order() {
        // Arrange
        let (client, server) = tokio::io::duplex(16);
        let (tx, mut bridge) = bridge_over(client, 2048);
        let commands: Vec<String> = (0..50).map(|i| format!("cmd {i}")).collect();
        for c in &commands {
            tx.submit(Command::from(c.as_str())).unwrap();
        }
        drop(tx);

        // Act: the small duplex buffer forces the reader to run concurrently.
        let (summary, received) = tokio::join!(bridge.run(), read_all(server));

        // Assert
        let summary = summary.unwrap();
        assert_eq!(summary.commands_forwarded, 50);
        let expected: String = commands.iter().map(|c| format!("{c}\n")).collect();
        assert_eq!(String::from_utf8(received).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_empty_command_is_sent_as_bare_newline() {
        let (client, server) = tokio::io::duplex(64);
        let (tx, mut bridge) = bridge_over(client, 2048);
        tx.submit(Command::from("")).unwrap();
        drop(tx);

        bridge.run().await.unwrap();

        assert_eq!(read_all(server).await, b"\n");
    }

    #[tokio::test]
    async fn test_embedded_newlines_are_forwarded_verbatim() {
        let (client, server) = tokio::io::duplex(64);
        let (tx, mut bridge) = bridge_over(client, 2048);
        tx.submit(Command::from("one\ntwo")).unwrap();
        drop(tx);

        bridge.run().await.unwrap();

        assert_eq!(read_all(server).await, b"one\ntwo\n");
    }

    #[tokio::test]
    async fn test_long_command_survives_partial_writes() {
        // Arrange: a 4 KiB command through an 8-byte pipe needs many writes.
        let (client, server) = tokio::io::duplex(8);
        let (tx, mut bridge) = bridge_over(client, 2048);
        let body = "x".repeat(4096);
        tx.submit(Command::from(body.as_str())).unwrap();
        drop(tx);

        // Act
        let (summary, received) = tokio::join!(bridge.run(), read_all(server));

        // Assert
        summary.unwrap();
        assert_eq!(received.len(), 4097);
        assert_eq!(&received[..4096], body.as_bytes());
        assert_eq!(received[4096], b'\n');
    }

    #[tokio::test]
    async fn test_chunks_are_concatenated_in_arrival_order() {
        // Arrange: a 5-byte read buffer splits every chunk further.
        let (client, mut server) = tokio::io::duplex(1024);
        let (_tx, mut bridge) = bridge_over(client, 5);
        let chunks: [&[u8]; 4] = [b"alpha\n", b"", b"\x00\xffbinary", b"tail"];

        let feed = async move {
            for chunk in chunks {
                server.write_all(chunk).await.unwrap();
                tokio::task::yield_now().await;
            }
        };

        // Act
        let (summary, ()) = tokio::join!(bridge.run(), feed);

        // Assert
        assert_eq!(summary.unwrap().end, SessionEnd::RemoteClosed);
        assert_eq!(bridge.log().as_slice(), b"alpha\n\x00\xffbinarytail");
    }

    #[tokio::test]
    async fn test_command_and_inbound_burst_at_the_same_time() {
        // Arrange
        let (client, server) = tokio::io::duplex(64);
        let (tx, mut bridge) = bridge_over(client, 256);
        let burst: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let expected = burst.clone();
        tx.submit(Command::from("simultaneous")).unwrap();

        let server_side = async move {
            let (mut rd, mut wr) = tokio::io::split(server);
            let write_burst = async {
                wr.write_all(&burst).await.unwrap();
            };
            let read_line = async {
                let mut line = vec![0u8; 13];
                rd.read_exact(&mut line).await.unwrap();
                line
            };
            let ((), line) = tokio::join!(write_burst, read_line);
            // Closing both halves ends the session with a zero-length read.
            line
        };

        // Act
        let (summary, line) = tokio::join!(bridge.run(), server_side);

        // Assert
        let summary = summary.unwrap();
        assert_eq!(summary.end, SessionEnd::RemoteClosed);
        assert_eq!(summary.commands_forwarded, 1);
        assert_eq!(line, b"simultaneous\n");
        assert_eq!(bridge.log().len(), expected.len());
        assert_eq!(bridge.log(), &expected);
        drop(tx);
    }

    #[tokio::test]
    async fn test_intake_close_shuts_down_write_side() {
        // Arrange
        let (client, server) = tokio::io::duplex(64);
        let (tx, mut bridge) = bridge_over(client, 2048);
        drop(tx);

        // Act
        let summary = bridge.run().await.unwrap();

        // Assert: the server observes end-of-stream, not a hang.
        assert_eq!(summary.end, SessionEnd::IntakeClosed);
        assert_eq!(summary.commands_forwarded, 0);
        assert!(read_all(server).await.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_connection_receives_exact_line() {
        // The mock panics on drop if the expected write never happened.
        let conn = tokio_test::io::Builder::new().write(b"status\n").build();
        let (tx, mut bridge) = bridge_over(conn, 2048);
        tx.submit(Command::from("status")).unwrap();
        drop(tx);

        let summary = bridge.run().await.unwrap();

        assert_eq!(summary.commands_forwarded, 1);
    }

    #[tokio::test]
    async fn test_interrupted_read_is_retried() {
        // Arrange
        let conn = tokio_test::io::Builder::new()
            .read_error(io::Error::from(io::ErrorKind::Interrupted))
            .read(b"OK\n")
            .build();
        let (_tx, mut bridge) = bridge_over(conn, 2048);

        // Act
        let summary = bridge.run().await.unwrap();

        // Assert
        assert_eq!(summary.end, SessionEnd::RemoteClosed);
        assert_eq!(bridge.log().as_slice(), b"OK\n");
    }

    #[tokio::test]
    async fn test_read_error_is_fatal() {
        let conn = tokio_test::io::Builder::new()
            .read_error(io::Error::from(io::ErrorKind::ConnectionReset))
            .build();
        let (_tx, mut bridge) = bridge_over(conn, 2048);

        let err = bridge.run().await.unwrap_err();

        assert!(matches!(err, BridgeError::ReadConnection(ref e) if e.kind() == io::ErrorKind::ConnectionReset));
        assert!(err.to_string().starts_with("read from connection"));
    }

    #[tokio::test]
    async fn test_write_error_is_fatal() {
        // Arrange
        let conn = tokio_test::io::Builder::new()
            .write_error(io::Error::from(io::ErrorKind::BrokenPipe))
            .build();
        let (tx, mut bridge) = bridge_over(conn, 2048);
        tx.submit(Command::from("status")).unwrap();

        // Act
        let err = bridge.run().await.unwrap_err();

        // Assert
        assert!(matches!(err, BridgeError::WriteConnection(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert!(err.to_string().starts_with("write to connection"));
    }

    #[tokio::test]
    async fn test_log_write_error_is_fatal() {
        // Arrange: the log sink refuses the first write.
        let (client, mut server) = tokio::io::duplex(64);
        let log = tokio_test::io::Builder::new()
            .write_error(io::Error::new(io::ErrorKind::Other, "disk full"))
            .build();
        let (_tx, rx) = intake_channel();
        let mut bridge = Bridge::new(client, log, rx, 2048);
        server.write_all(b"data").await.unwrap();

        // Act
        let err = bridge.run().await.unwrap_err();

        // Assert
        assert!(matches!(err, BridgeError::WriteLog(_)));
        assert_eq!(err.to_string(), "write to log: disk full");
    }

    #[test]
    fn test_zero_read_buffer_is_raised_to_one_byte() {
        let (client, _server) = tokio::io::duplex(8);
        let (_tx, bridge) = bridge_over(client, 0);
        assert_eq!(bridge.read_buf.len(), 1);
    }
}
