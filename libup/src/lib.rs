//! UP (Unified Properties) parser implementation.
//!
//! UP is a line-oriented configuration notation. Each line holds a key, an
//! optional `!annotation`, and a value: plain text, a `{ }` block of nested
//! entries, a `[ ]` list of text items, or a fenced multiline string.
//!
//! # Parsing Pipeline
//!
//! The parser operates in two phases:
//!
//! 1. **Scanner**: Splits source text into raw lines, normalizing `\n`,
//!    `\r\n`, and `\r` terminators.
//!
//! 2. **Value Parser**: Walks the lines with one forward cursor, recursing
//!    into blocks, lists, and multiline strings to build a [`Document`].

mod document;
mod encode;
mod error;
mod parser;
mod scanner;
mod value;

use std::fs;
use std::path::Path;

pub use document::Document;
pub use encode::{encode, encode_value, Format};
pub use error::{ParseError, ParseOptions, Result};
pub use value::{Block, Node, Value};

/// Parse a UP document from a string.
///
/// Unterminated blocks, lists, and multiline strings are closed at the end of
/// input, so this never fails.
///
/// # Example
///
/// ```
/// let doc = libup::parse("age!int 30");
/// let node = doc.get("age").unwrap();
/// assert_eq!(node.annotation(), Some("int"));
/// assert_eq!(node.value.as_str(), Some("30"));
/// ```
pub fn parse(input: &str) -> Document {
    // lenient parsing has no failure path
    parse_with_options(input, &ParseOptions::default()).unwrap_or_default()
}

/// Parse a UP document from a string with explicit options.
pub fn parse_with_options(input: &str, opts: &ParseOptions) -> Result<Document> {
    // Phase 1: Scan source into lines
    let lines = scanner::scan(input);

    // Phase 2: Parse lines into a document
    parser::parse_document(&lines, opts)
}

/// Read a file fully and parse it.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    parse_file_with_options(path, &ParseOptions::default())
}

/// Read a file fully and parse it with explicit options. The path is used as
/// the filename in error messages unless one is already set.
pub fn parse_file_with_options(path: impl AsRef<Path>, opts: &ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;

    if opts.filename.is_some() {
        parse_with_options(&input, opts)
    } else {
        let opts = opts.clone().with_filename(path.display().to_string());
        parse_with_options(&input, &opts)
    }
}
