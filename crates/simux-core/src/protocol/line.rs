//! Newline framing.
//!
//! Wire format of one command:
//! ```text
//! [body:N][0x0A]
//! ```
//! The body is copied verbatim.  Embedded `\n` bytes are not escaped; the
//! remote sees them as extra lines, exactly as the operator typed them.

use crate::domain::command::Command;

/// The single byte appended to every command on the wire.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Builds the wire payload for `command`: its body followed by `\n`.
///
/// # Examples
///
/// ```rust
/// use simux_core::{encode_command, Command};
///
/// assert_eq!(encode_command(&Command::from("status")), b"status\n");
/// assert_eq!(encode_command(&Command::from("")), b"\n");
/// ```
pub fn encode_command(command: &Command) -> Vec<u8> {
    let body = command.as_str().as_bytes();
    let mut buf = Vec::with_capacity(body.len() + 1);
    buf.extend_from_slice(body);
    buf.push(LINE_TERMINATOR);
    buf
}
