//! simux library crate.
//!
//! `simux` connects to one TCP server, reads commands from an interactive
//! prompt, sends each command to the server as a `\n`-terminated line, and
//! appends every byte the server sends back to a local log file.
//!
//! # Architecture
//!
//! ```text
//! operator ──► prompt loop (OS thread) ──► intake channel ──┐
//!                                                           ▼
//!                       server ◄──── commands ──── [ Bridge task ]
//!                       server ────── bytes ─────►      │
//!                                                       ▼
//!                                                  output.log
//! ```
//!
//! - `domain/`          Session configuration (no I/O)
//! - `application/`     The bridge event loop, the intake channel, the prompt loop
//! - `infrastructure/`  TCP bootstrap, log sink, history file, config file, line editor
//! - `exit_code`        Process exit codes for each failure class
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `simux-core`; it reaches the
//!   terminal and the history file only through the `LineSource` and
//!   `HistorySink` traits.
//! - `infrastructure` implements those traits and owns every OS resource.

/// Domain layer: session configuration.
pub mod domain;

/// Application layer: bridge, intake channel and prompt loop.
pub mod application;

/// Infrastructure layer: sockets, files and the terminal.
pub mod infrastructure;

/// Exit codes reported by the `simux` binary.
pub mod exit_code;
