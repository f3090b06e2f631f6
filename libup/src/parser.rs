//! Phase 2: Value Parser
//!
//! The value parser walks the scanned lines with a single forward cursor and
//! builds the document tree. Nested constructs advance the same cursor as
//! their caller, so a block or list consumes exactly the lines up to its
//! closing marker. Nothing is read twice.
//!
//! Each entry line is `key[!annotation] value`. The value text selects the
//! construct:
//! - `` ``` ``: multiline string, raw lines up to a closing fence
//! - `{`: block of entries up to `}`
//! - `[`: list of text items up to `]`
//! - anything else: a plain string

use crate::document::Document;
use crate::error::{ParseError, ParseOptions, Result};
use crate::value::{Block, Node, Value};
use tracing::{debug, trace, warn};

const FENCE: &str = "```";

/// Parse scanned lines into a document.
pub fn parse_document(lines: &[&str], opts: &ParseOptions) -> Result<Document> {
    debug!(lines = lines.len(), filename = ?opts.filename, "parsing document");

    let mut parser = Parser::new(lines, opts);
    let mut doc = Document::new();
    while !parser.at_end() {
        if let Some(node) = parser.parse_line()? {
            doc.push(node);
        }
    }

    debug!(nodes = doc.len(), "parsed document");
    Ok(doc)
}

/// Trim the ASCII whitespace set (`isspace` in the C locale). Other Unicode
/// whitespace such as NBSP or U+3000 is content.
fn trim_line(s: &str) -> &str {
    s.trim_matches(is_line_space)
}

fn is_line_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Blank lines and `#` comments are skipped everywhere except inside
/// multiline strings.
fn is_trivia(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Split an entry line at the first space or tab.
/// Returns (key segment, value text, byte offset of the value text).
fn split_entry(trimmed: &str) -> (&str, &str, usize) {
    match trimmed.find(|c: char| c == ' ' || c == '\t') {
        Some(sep) => {
            let rest = &trimmed[sep + 1..];
            let value = trim_line(rest);
            let offset = sep + 1 + (rest.len() - rest.trim_start_matches(is_line_space).len());
            (&trimmed[..sep], value, offset)
        }
        None => (trimmed, "", trimmed.len()),
    }
}

/// Split a key segment at the first `!` into key and annotation.
fn split_annotation(segment: &str) -> (&str, Option<&str>) {
    match segment.split_once('!') {
        Some((key, annotation)) => (key, Some(annotation)),
        None => (segment, None),
    }
}

struct Parser<'a> {
    lines: &'a [&'a str],
    pos: usize,
    opts: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    fn new(lines: &'a [&'a str], opts: &'a ParseOptions) -> Self {
        Self {
            lines,
            pos: 0,
            opts,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Current line, trimmed.
    fn current(&self) -> &'a str {
        trim_line(self.lines[self.pos])
    }

    /// Consume one logical entry. Trivia lines are consumed and yield `None`.
    fn parse_line(&mut self) -> Result<Option<Node>> {
        let raw = self.lines[self.pos];
        let line = trim_line(raw);
        if is_trivia(line) {
            self.pos += 1;
            return Ok(None);
        }

        let (segment, text, offset) = split_entry(line);
        let (key, annotation) = split_annotation(segment);

        let line_num = self.pos;
        // columns count characters, not bytes
        let start = raw.len() - raw.trim_start_matches(is_line_space).len() + offset;
        let col = raw[..start].chars().count();
        self.pos += 1;

        let value = self.parse_value(text, line_num, col)?;
        Ok(Some(Node::new(key, annotation, value)))
    }

    /// Select a construct from the value text of the entry opened at
    /// `line_num`.
    fn parse_value(&mut self, text: &str, line_num: usize, col: usize) -> Result<Value> {
        if text.starts_with(FENCE) {
            self.parse_multiline(line_num, col)
        } else if text == "{" {
            self.parse_block(line_num, col)
        } else if text == "[" {
            self.parse_list(line_num, col)
        } else {
            Ok(Value::String(text.to_string()))
        }
    }

    /// Collect raw lines up to a line that trims to the fence. Anything after
    /// the opening fence on the entry line is ignored.
    fn parse_multiline(&mut self, line_num: usize, col: usize) -> Result<Value> {
        trace!(line = line_num + 1, "multiline string");
        let mut body: Vec<&str> = Vec::new();

        while !self.at_end() {
            if self.current() == FENCE {
                self.pos += 1;
                return Ok(Value::String(body.join("\n")));
            }
            body.push(self.lines[self.pos]);
            self.pos += 1;
        }

        self.close_at_end(ParseError::UnterminatedString(String::new()), line_num, col)?;
        Ok(Value::String(body.join("\n")))
    }

    /// Parse entries up to a line that trims to `}`.
    fn parse_block(&mut self, line_num: usize, col: usize) -> Result<Value> {
        trace!(line = line_num + 1, "block");
        let mut block = Block::new();

        while !self.at_end() {
            if self.current() == "}" {
                self.pos += 1;
                return Ok(Value::Block(block));
            }
            if let Some(node) = self.parse_line()? {
                block.push(node);
            }
        }

        self.close_at_end(ParseError::UnterminatedBlock(String::new()), line_num, col)?;
        Ok(Value::Block(block))
    }

    /// Collect trimmed lines up to a line that trims to `]`. Items are always
    /// plain strings; `{`, `[`, and `key value` lines are taken as text.
    fn parse_list(&mut self, line_num: usize, col: usize) -> Result<Value> {
        trace!(line = line_num + 1, "list");
        let mut items = Vec::new();

        while !self.at_end() {
            let line = self.current();
            self.pos += 1;
            if line == "]" {
                return Ok(Value::List(items));
            }
            if !is_trivia(line) {
                items.push(Value::String(line.to_string()));
            }
        }

        self.close_at_end(ParseError::UnterminatedList(String::new()), line_num, col)?;
        Ok(Value::List(items))
    }

    /// Input ran out inside a construct: fail in strict mode, otherwise close
    /// it here.
    fn close_at_end(&self, err: ParseError, line_num: usize, col: usize) -> Result<()> {
        if self.opts.strict {
            return Err(err.with_location(self.opts, line_num, col));
        }
        warn!(line = line_num + 1, "{} closed at end of input", err);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn parse(source: &str) -> Document {
        parse_document(&scan(source), &ParseOptions::new()).unwrap()
    }

    fn parse_strict(source: &str) -> Result<Document> {
        parse_document(&scan(source), &ParseOptions::new().strict(true))
    }

    #[test]
    fn test_split_entry() {
        assert_eq!(split_entry("key value"), ("key", "value", 4));
        assert_eq!(split_entry("key\t  spaced  out"), ("key", "spaced  out", 6));
        assert_eq!(split_entry("key"), ("key", "", 3));
        assert_eq!(split_entry("a\tb c"), ("a", "b c", 2));
    }

    #[test]
    fn test_split_annotation() {
        assert_eq!(split_annotation("age!int"), ("age", Some("int")));
        assert_eq!(split_annotation("age"), ("age", None));
        assert_eq!(split_annotation("a!b!c"), ("a", Some("b!c")));
        assert_eq!(split_annotation("!int"), ("", Some("int")));
    }

    #[test]
    fn test_plain_string_taken_literally() {
        let doc = parse(r#"path "C:\dir" # not a comment"#);
        let node = doc.get("path").unwrap();
        assert_eq!(node.value.as_str(), Some(r#""C:\dir" # not a comment"#));
    }

    #[test]
    fn test_key_without_value() {
        let doc = parse("flag");
        assert_eq!(doc.get("flag").unwrap().value.as_str(), Some(""));
    }

    #[test]
    fn test_annotation_does_not_change_value() {
        let doc = parse("age!int 30\nactive!bool true");
        let age = doc.get("age").unwrap();
        assert_eq!(age.annotation(), Some("int"));
        assert_eq!(age.value, Value::from("30"));
        assert_eq!(doc.get("active").unwrap().value.as_str(), Some("true"));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let doc = parse("# header\n\n  a 1\n   # indented comment\nb 2\n");
        let keys: Vec<&str> = doc.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_block() {
        let doc = parse("k {\n  a 1\n\n  # note\n  b 2\n}\nafter x");
        let block = doc.get("k").unwrap().value.as_block().unwrap();
        assert_eq!(block.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(block.get("b"), Some(&Value::from("2")));
        assert_eq!(doc.get("after").unwrap().value.as_str(), Some("x"));
    }

    #[test]
    fn test_nested_block_and_list() {
        let doc = parse("server {\n  tls {\n    cert a.pem\n  }\n  hosts [\n    one\n  ]\n}");
        let server = doc.get("server").unwrap().value.as_block().unwrap();
        let tls = server.get("tls").unwrap().as_block().unwrap();
        assert_eq!(tls.get("cert"), Some(&Value::from("a.pem")));
        let hosts = server.get("hosts").unwrap().as_list().unwrap();
        assert_eq!(hosts, &[Value::from("one")]);
    }

    #[test]
    fn test_list_items_are_opaque() {
        let doc = parse("k [\n{ not a block }\n{\nkey value\n# skipped\n\nx\n]");
        let items = doc.get("k").unwrap().value.as_list().unwrap();
        assert_eq!(
            items,
            &[
                Value::from("{ not a block }"),
                Value::from("{"),
                Value::from("key value"),
                Value::from("x"),
            ]
        );
    }

    #[test]
    fn test_multiline() {
        let doc = parse("k ```\nline1\nline2\n```");
        assert_eq!(doc.get("k").unwrap().value.as_str(), Some("line1\nline2"));
    }

    #[test]
    fn test_multiline_preserves_raw_lines() {
        let doc = parse("k!text ```ignored\n  indented\n\n# kept\n  ```  \nnext 1");
        let node = doc.get("k").unwrap();
        assert_eq!(node.annotation(), Some("text"));
        assert_eq!(node.value.as_str(), Some("  indented\n\n# kept"));
        assert_eq!(doc.get("next").unwrap().value.as_str(), Some("1"));
    }

    #[test]
    fn test_empty_multiline() {
        let doc = parse("k ```\n```");
        assert_eq!(doc.get("k").unwrap().value.as_str(), Some(""));
    }

    #[test]
    fn test_unterminated_constructs_close_at_end() {
        let doc = parse("k {\na 1");
        let block = doc.get("k").unwrap().value.as_block().unwrap();
        assert_eq!(block.get("a"), Some(&Value::from("1")));

        let doc = parse("k [\nx");
        assert_eq!(doc.get("k").unwrap().value.as_list().unwrap().len(), 1);

        let doc = parse("k ```\nbody");
        assert_eq!(doc.get("k").unwrap().value.as_str(), Some("body"));
    }

    #[test]
    fn test_strict_unterminated() {
        assert!(matches!(
            parse_strict("k {\na 1"),
            Err(ParseError::UnterminatedBlock(_))
        ));
        assert!(matches!(
            parse_strict("k [\nx"),
            Err(ParseError::UnterminatedList(_))
        ));
        assert!(matches!(
            parse_strict("k ```\nx"),
            Err(ParseError::UnterminatedString(_))
        ));
        assert!(parse_strict("k {\na [\nx\n]\n}").is_ok());
    }

    #[test]
    fn test_strict_error_location() {
        let opts = ParseOptions::new().strict(true).with_filename("app.up");
        let lines = scan("a 1\nouter {\n  inner [\n    x\n}");
        let err = parse_document(&lines, &opts).unwrap_err();
        // the list takes "}" as an item and runs out first
        assert_eq!(err.to_string(), "Unterminated list at 3:9 of <app.up>");
    }

    #[test]
    fn test_strict_error_column_counts_characters() {
        let opts = ParseOptions::new().strict(true).with_filename("ru.up");
        let err = parse_document(&scan("ключ {\n"), &opts).unwrap_err();
        assert_eq!(err.to_string(), "Unterminated block at 1:6 of <ru.up>");

        let err = parse_document(&scan("\tназвание [\n"), &opts).unwrap_err();
        assert_eq!(err.to_string(), "Unterminated list at 1:11 of <ru.up>");
    }

    #[test]
    fn test_unicode_whitespace_is_content() {
        // U+3000 around `{` keeps it from opening a block
        let doc = parse("k \u{3000}{\na 1\n}");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get("k").unwrap().value.as_str(), Some("\u{3000}{"));
        assert_eq!(doc.get("a").unwrap().value.as_str(), Some("1"));

        let doc = parse("v \u{a0}x\u{a0}");
        assert_eq!(doc.get("v").unwrap().value.as_str(), Some("\u{a0}x\u{a0}"));

        let doc = parse("l [\n\u{a0}item\n]");
        let items = doc.get("l").unwrap().value.as_list().unwrap();
        assert_eq!(items, &[Value::from("\u{a0}item")]);
    }

    #[test]
    fn test_trim_line_ascii_only() {
        assert_eq!(trim_line(" \t\x0b\x0cv\r\n"), "v");
        assert_eq!(trim_line("\u{2003}v\u{2003}"), "\u{2003}v\u{2003}");
    }

    #[test]
    fn test_stray_closer_at_top_level_is_an_entry() {
        let doc = parse("}\n]");
        let keys: Vec<&str> = doc.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["}", "]"]);
    }
}
