//! # simux-core
//!
//! Shared types for the simux line client.  Nothing in this crate touches a
//! socket, a file, or a terminal; it only describes *what* travels between
//! the operator and the remote server.
//!
//! - **`domain`** – the operator [`Command`] and the validated [`Endpoint`]
//!   the client connects to.
//! - **`protocol`** – the wire framing.  The protocol is plain text: every
//!   command is terminated by a single `\n` and nothing else is added.

pub mod domain;
pub mod protocol;

pub use domain::command::Command;
pub use domain::endpoint::{Endpoint, EndpointError};
pub use protocol::line::{encode_command, LINE_TERMINATOR};
