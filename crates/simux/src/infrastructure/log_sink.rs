//! The append-only log of inbound server bytes.
//!
//! The file is opened once per session with `O_APPEND | O_CREAT`, so every
//! write lands at the current end of file.  Re-running the client against the
//! same path keeps the earlier sessions' bytes.

use std::io;
use std::path::Path;

use tokio::fs::{File, OpenOptions};
use tracing::debug;

/// Opens (creating if absent) the log file at `path` in append mode.
///
/// # Errors
///
/// Returns the I/O error from `open(2)`, e.g. a missing parent directory or
/// insufficient permissions.
pub async fn open_log_sink(path: &Path) -> io::Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    debug!("log sink open at {}", path.display());
    Ok(file)
}
