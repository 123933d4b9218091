//! Infrastructure layer for simux.
//!
//! Everything that touches the OS lives here:
//!
//! - **`bootstrap`** – name resolution and the one TCP connect of the session.
//! - **`log_sink`** – the append-mode log file for inbound bytes.
//! - **`history`** – the plain-text prompt history ([`HistorySink`] impl).
//! - **`line_editor`** – the `rustyline` prompt ([`LineSource`] impl).
//! - **`config_file`** – the optional TOML config file.
//!
//! [`HistorySink`]: crate::application::prompt_loop::HistorySink
//! [`LineSource`]: crate::application::prompt_loop::LineSource

pub mod bootstrap;
pub mod config_file;
pub mod history;
pub mod line_editor;
pub mod log_sink;

pub use bootstrap::{connect, BootstrapError};
pub use config_file::{load_config, ConfigError};
pub use history::HistoryFile;
pub use line_editor::RustylineSource;
pub use log_sink::open_log_sink;
