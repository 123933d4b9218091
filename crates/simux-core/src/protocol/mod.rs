//! Wire framing for operator commands.
//!
//! The only framing the protocol has is the trailing line terminator the
//! client appends to every command.  Inbound bytes are not framed at all;
//! they are logged exactly as the socket delivers them.

pub mod line;

pub use line::{encode_command, LINE_TERMINATOR};
