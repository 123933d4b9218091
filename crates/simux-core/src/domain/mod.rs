//! Domain types with no I/O dependencies.

pub mod command;
pub mod endpoint;
