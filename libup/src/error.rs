//! Error types for UP parsing.

use std::io;
use thiserror::Error;

/// Result type for UP parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse options carrying the filename for error reporting and the
/// termination policy for open constructs.
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    pub filename: Option<String>,
    /// Fail on a block, list, or multiline string left open at end of input
    /// instead of closing it implicitly.
    pub strict: bool,
}

impl ParseOptions {
    /// Create lenient options with no filename.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a filename for error messages.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Turn strict termination on or off.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => String::new(),
        }
    }
}

/// Error type for UP parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Source file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Block opened with `{` and never closed.
    #[error("Unterminated block{0}")]
    UnterminatedBlock(String),

    /// List opened with `[` and never closed.
    #[error("Unterminated list{0}")]
    UnterminatedList(String),

    /// Multiline string opened with a fence and never closed.
    #[error("Unterminated multiline string{0}")]
    UnterminatedString(String),
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, opts: &ParseOptions, line: usize, col: usize) -> Self {
        let suffix = opts.loc_suffix(line, col);
        match self {
            ParseError::UnterminatedBlock(_) => ParseError::UnterminatedBlock(suffix),
            ParseError::UnterminatedList(_) => ParseError::UnterminatedList(suffix),
            ParseError::UnterminatedString(_) => ParseError::UnterminatedString(suffix),
            io @ ParseError::Io { .. } => io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loc_suffix_without_filename() {
        let opts = ParseOptions::new();
        assert_eq!(opts.loc_suffix(3, 0), "");
    }

    #[test]
    fn test_with_location() {
        let opts = ParseOptions::new().with_filename("server.up");
        let err = ParseError::UnterminatedBlock(String::new()).with_location(&opts, 4, 7);
        assert_eq!(err.to_string(), "Unterminated block at 5:8 of <server.up>");
    }

    #[test]
    fn test_io_message() {
        let err = ParseError::Io {
            path: "missing.up".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read missing.up: No such file or directory"
        );
    }
}
