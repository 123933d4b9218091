//! `rustyline`-backed [`LineSource`].
//!
//! Provides line editing and in-memory history at the operator prompt.  The
//! history is seeded from the history file at start-up; persisting new
//! entries is the prompt loop's job (via [`HistorySink`]), not the editor's.
//!
//! [`HistorySink`]: crate::application::prompt_loop::HistorySink

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::application::prompt_loop::{LineSource, PromptError, PromptEvent};

/// Interactive prompt on the controlling terminal.
///
/// When stdin is not a terminal, `rustyline` falls back to reading plain
/// lines, so piped input works too.
pub struct RustylineSource {
    editor: DefaultEditor,
    prompt: String,
}

impl RustylineSource {
    /// Creates the editor and loads `history` (oldest first).
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Editor`] if the terminal cannot be set up.
    pub fn new(prompt: impl Into<String>, history: &[String]) -> Result<Self, PromptError> {
        let mut editor = DefaultEditor::new().map_err(editor_error)?;
        for entry in history {
            editor
                .add_history_entry(entry.as_str())
                .map_err(editor_error)?;
        }
        Ok(Self {
            editor,
            prompt: prompt.into(),
        })
    }
}

impl LineSource for RustylineSource {
    fn read_line(&mut self) -> Result<PromptEvent, PromptError> {
        to_event(self.editor.readline(&self.prompt))
    }

    fn remember(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!("could not add line to editor history: {e}");
        }
    }
}

fn editor_error(e: ReadlineError) -> PromptError {
    PromptError::Editor(Box::new(e))
}

/// Ctrl-C and Ctrl-D arrive as errors from `rustyline`; they are ordinary
/// prompt events here.
fn to_event(result: rustyline::Result<String>) -> Result<PromptEvent, PromptError> {
    match result {
        Ok(line) => Ok(PromptEvent::Line(line)),
        Err(ReadlineError::Interrupted) => Ok(PromptEvent::Interrupted),
        Err(ReadlineError::Eof) => Ok(PromptEvent::EndOfInput),
        Err(e) => Err(editor_error(e)),
    }
}
