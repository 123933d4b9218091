//! The operator prompt loop.
//!
//! Runs on its own OS thread, blocked on the keyboard.  Every completed line
//! is remembered by the line editor, appended to the persistent history, and
//! then moved into the intake channel as a [`Command`].  The loop never
//! touches the connection or the log sink, so a silent operator never stalls
//! the bridge and a silent server never stalls the prompt.
//!
//! The terminal and the history file are reached through two traits so the
//! loop can be driven by scripted input in tests:
//!
//! - [`LineSource`] – produces [`PromptEvent`]s (a `rustyline` editor in
//!   production).
//! - [`HistorySink`] – persists submitted lines (a plain-text file in
//!   production).

use std::error::Error as StdError;
use std::io;

use simux_core::Command;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::intake::IntakeSender;

/// Failures that end the prompt loop.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The line editor could not be created or could not read from the terminal.
    #[error("line editor: {0}")]
    Editor(#[source] Box<dyn StdError + Send + Sync>),

    /// The bridge stopped, so there is nobody left to send commands to.
    #[error("intake channel closed; command not sent")]
    IntakeClosed,
}

/// One result of asking the operator for a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// A completed line, without its trailing newline.
    Line(String),
    /// The operator pressed Ctrl-C; the partial line is discarded.
    Interrupted,
    /// The operator pressed Ctrl-D on an empty line, or stdin ended.
    EndOfInput,
}

/// Source of operator input.
#[cfg_attr(test, mockall::automock)]
pub trait LineSource {
    /// Blocks until the operator finishes a line or ends input.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Editor`] if the terminal cannot be read.
    fn read_line(&mut self) -> Result<PromptEvent, PromptError>;

    /// Adds a submitted line to the editor's in-memory history.
    fn remember(&mut self, line: &str);
}

/// Persistent record of submitted lines.
#[cfg_attr(test, mockall::automock)]
pub trait HistorySink {
    /// Appends one entry.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.  The prompt loop logs it and carries on.
    fn append(&mut self, entry: &str) -> io::Result<()>;
}

/// Reads lines from `source` until end-of-input and submits each as a command.
///
/// Returns the number of commands submitted.  `intake` is dropped on return,
/// which tells the bridge that no more commands will arrive.
///
/// # Errors
///
/// - [`PromptError::Editor`] if `source` fails.
/// - [`PromptError::IntakeClosed`] if the bridge has already stopped.
pub fn run_prompt_loop<S, H>(
    source: &mut S,
    history: &mut H,
    intake: IntakeSender,
) -> Result<u64, PromptError>
where
    S: LineSource + ?Sized,
    H: HistorySink + ?Sized,
{
    let mut submitted = 0u64;

    loop {
        match source.read_line()? {
            PromptEvent::Line(line) => {
                source.remember(&line);
                if let Err(e) = history.append(&line) {
                    warn!("could not persist history entry: {e}");
                }

                intake
                    .submit(Command::from(line))
                    .map_err(|_| PromptError::IntakeClosed)?;
                submitted += 1;
            }
            PromptEvent::Interrupted => {
                debug!("prompt interrupted; line discarded");
            }
            PromptEvent::EndOfInput => {
                info!(submitted, "operator ended input");
                return Ok(submitted);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
