//! Render UP documents as text.
//!
//! Two renderings live here: the indented tree dump used to inspect a parsed
//! document, and JSON. Binary and third-party formats (YAML, TOML, CBOR) are
//! handled by the CLI tool (binup) with dedicated libraries.

use crate::document::Document;
use crate::value::{Node, Value};

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Indented `key!annotation: value` dump
    Tree,
    /// JSON (annotations dropped, first duplicate key wins)
    Json,
}

/// Encode a whole document in the specified format.
pub fn encode(doc: &Document, format: Format) -> String {
    match format {
        Format::Tree => doc.iter().map(|node| encode_tree_node(node, 0)).collect(),
        Format::Json => format!("{}\n", encode_json_nodes(doc.nodes(), 0)),
    }
}

/// Encode a single value in the specified format.
pub fn encode_value(value: &Value, format: Format) -> String {
    match format {
        Format::Tree => encode_tree(value, 0),
        Format::Json => format!("{}\n", encode_json(value, 0)),
    }
}

// =============================================================================
// Tree Dump
// =============================================================================

fn encode_tree_node(node: &Node, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    match &node.annotation {
        Some(annotation) => format!(
            "{}{}!{}: {}",
            pad,
            node.key,
            annotation,
            encode_tree(&node.value, indent)
        ),
        None => format!("{}{}: {}", pad, node.key, encode_tree(&node.value, indent)),
    }
}

fn encode_tree(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);

    match value {
        // Multiline bodies are written as-is
        Value::String(s) => format!("{}\n", s),
        Value::Block(block) => {
            let mut out = String::from("{\n");
            for node in block {
                out.push_str(&encode_tree_node(node, indent + 1));
            }
            out.push_str(&format!("{}}}\n", pad));
            out
        }
        Value::List(items) => {
            let pad1 = "  ".repeat(indent + 1);
            let mut out = String::from("[\n");
            for item in items {
                out.push_str(&pad1);
                out.push_str(&encode_tree(item, indent + 1));
            }
            out.push_str(&format!("{}]\n", pad));
            out
        }
    }
}

// =============================================================================
// JSON Encoder
// =============================================================================

fn encode_json(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match value {
        Value::String(s) => encode_json_string(s),
        Value::Block(block) => encode_json_nodes(block.nodes(), indent),
        Value::List(items) => {
            if items.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = items.iter().map(|v| encode_json(v, indent + 1)).collect();
                format!(
                    "[\n{}\n{}]",
                    items
                        .iter()
                        .map(|i| format!("{}{}", pad1, i))
                        .collect::<Vec<_>>()
                        .join(",\n"),
                    pad
                )
            }
        }
    }
}

/// Encode nodes as a JSON object in source order, keeping only the first
/// node for each key.
fn encode_json_nodes(nodes: &[Node], indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    let mut seen: Vec<&str> = Vec::new();
    let mut items: Vec<String> = Vec::new();
    for node in nodes {
        if seen.contains(&node.key.as_str()) {
            continue;
        }
        seen.push(&node.key);
        items.push(format!(
            "{}{}: {}",
            pad1,
            encode_json_string(&node.key),
            encode_json(&node.value, indent + 1)
        ));
    }

    if items.is_empty() {
        "{}".to_string()
    } else {
        format!("{{\n{}\n{}}}", items.join(",\n"), pad)
    }
}

fn encode_json_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_tree() {
        let doc = parse("name John\nage!int 30\nserver {\n  port!int 8080\n}\nitems [\na\nb\n]");
        assert_eq!(
            encode(&doc, Format::Tree),
            "name: John\n\
             age!int: 30\n\
             server: {\n  port!int: 8080\n}\n\
             items: [\n  a\n  b\n]\n"
        );
    }

    #[test]
    fn test_tree_nested_indent() {
        let doc = parse("a {\nb {\nc [\nx\n]\n}\n}");
        assert_eq!(
            encode(&doc, Format::Tree),
            "a: {\n  b: {\n    c: [\n      x\n    ]\n  }\n}\n"
        );
    }

    #[test]
    fn test_json_first_duplicate_wins() {
        let doc = parse("x 1\ny 2\nx 3");
        assert_eq!(
            encode(&doc, Format::Json),
            "{\n  \"x\": \"1\",\n  \"y\": \"2\"\n}\n"
        );
    }

    #[test]
    fn test_json_empty() {
        let doc = parse("# nothing here\n");
        assert_eq!(encode(&doc, Format::Json), "{}\n");
        let doc = parse("k {\n}\nl [\n]");
        assert_eq!(
            encode(&doc, Format::Json),
            "{\n  \"k\": {},\n  \"l\": []\n}\n"
        );
    }

    #[test]
    fn test_json_string_escapes() {
        assert_eq!(encode_json_string("a\"b\\c\nd\te"), r#""a\"b\\c\nd\te""#);
        assert_eq!(encode_json_string("\x01"), r#""\u0001""#);
    }

    #[test]
    fn test_encode_value() {
        let value = Value::List(vec![Value::from("a")]);
        assert_eq!(encode_value(&value, Format::Tree), "[\n  a\n]\n");
        assert_eq!(encode_value(&value, Format::Json), "[\n  \"a\"\n]\n");
    }
}
