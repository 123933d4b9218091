//! Application layer for simux.
//!
//! The application layer knows *what* a session does: hand operator commands
//! to the bridge in order, and have the bridge move bytes between the server,
//! the log and the operator.  Sockets, files and the terminal are supplied by
//! the infrastructure layer.

pub mod bridge;
pub mod intake;
pub mod prompt_loop;

pub use bridge::{Bridge, BridgeError, BridgeSummary, SessionEnd};
pub use intake::{intake_channel, IntakeClosed, IntakeReceiver, IntakeSender};
pub use prompt_loop::{run_prompt_loop, HistorySink, LineSource, PromptError, PromptEvent};
