//! The operator command.
//!
//! A [`Command`] is one line of text the operator submitted at the prompt.
//! It is produced once by the prompt loop, moved through the intake channel,
//! and consumed once by the bridge, which frames it and writes it to the
//! server.  The body is never sanitised: an empty command is legal, and so is
//! a command containing embedded newlines.

use std::fmt;

/// One operator-submitted line destined for the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Command(String);

impl Command {
    /// Wraps `text` as a command without modifying it.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the command body as entered by the operator.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the body in bytes, without the line terminator.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the operator submitted an empty line.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the command and returns the owned body.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Command {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
