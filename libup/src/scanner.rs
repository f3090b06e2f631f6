//! Phase 1: Scanner
//!
//! The scanner splits raw source text into lines. It recognizes `\n`, `\r`,
//! and `\r\n` as terminators and leaves everything else alone: no trimming,
//! no comment filtering, no blank-line removal. Those belong to the parser.

use tracing::trace;

/// Split source text into raw lines borrowed from the input.
///
/// A final segment without a terminator is kept if it is non-empty, so
/// `"a\nb"` and `"a\nb\n"` both scan to two lines.
pub fn scan(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&source[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&source[start..i]);
                // "\r\n" is a single terminator
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&source[start..]);
    }

    trace!(lines = lines.len(), "scanned source");
    lines
}
