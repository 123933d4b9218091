//! Plain-text prompt history.
//!
//! One entry per line, appended after every submission.  The file is read
//! once at start-up to seed the line editor and is never rewritten, so it
//! grows without bound.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::application::prompt_loop::HistorySink;

/// The history file at a fixed path.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every stored entry, oldest first.
    ///
    /// A file that does not exist yet is an empty history.
    ///
    /// # Errors
    ///
    /// Returns any other I/O error, including invalid UTF-8.
    pub fn load(&self) -> io::Result<Vec<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_owned).collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

impl HistorySink for HistoryFile {
    fn append(&mut self, entry: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{entry}")
    }
}
