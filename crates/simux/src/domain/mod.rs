//! Domain layer for simux.
//!
//! Only plain configuration lives here.  Reading that configuration from
//! disk or from the command line is the job of the infrastructure layer and
//! `main.rs`.

pub mod config;

pub use config::{SessionConfig, SessionConfigError};
