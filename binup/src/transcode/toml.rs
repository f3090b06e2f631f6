//! TOML transcoding: convert UP documents to TOML text.
//!
//! Mapping from UP to TOML:
//!   - Value::String       -> TOML string
//!   - Value::List         -> TOML array
//!   - Value::Block        -> TOML table (inline table inside an array)
//!   - Document            -> top-level TOML table
//!
//! Lossy edges:
//!   - TOML has no place for type annotations; they are dropped.
//!   - TOML tables have unique keys; the first node for a key wins.
//!   - A single value must be a block to stand alone as a TOML document.

use libup::{Document, Node, Value};
use toml_edit::DocumentMut;

/// Encode a UP document as a TOML string.
pub fn encode(doc: &Document) -> String {
    let mut out = DocumentMut::new();
    for (key, item) in nodes_to_table(doc.nodes()).iter() {
        out[key] = item.clone();
    }
    out.to_string()
}

/// Encode a single UP value as a TOML string.
pub fn encode_value(value: &Value) -> Result<String, String> {
    match value {
        Value::Block(block) => {
            let mut out = DocumentMut::new();
            for (key, item) in nodes_to_table(block.nodes()).iter() {
                out[key] = item.clone();
            }
            Ok(out.to_string())
        }
        _ => Err("TOML requires the top-level value to be a table/block".to_string()),
    }
}

fn nodes_to_table(nodes: &[Node]) -> toml_edit::Table {
    let mut table = toml_edit::Table::new();
    for node in nodes {
        if table.contains_key(&node.key) {
            continue;
        }
        table.insert(&node.key, value_to_toml(&node.value));
    }
    table
}

fn value_to_toml(value: &Value) -> toml_edit::Item {
    match value {
        Value::String(s) => toml_edit::Item::Value(toml_edit::Value::String(
            toml_edit::Formatted::new(s.clone()),
        )),
        Value::Block(block) => toml_edit::Item::Table(nodes_to_table(block.nodes())),
        Value::List(_) => toml_edit::Item::Value(value_to_inline(value)),
    }
}

/// Arrays hold values, not tables, so everything below a list is inline.
fn value_to_inline(value: &Value) -> toml_edit::Value {
    match value {
        Value::String(s) => toml_edit::Value::from(s.as_str()),
        Value::List(items) => {
            toml_edit::Value::Array(items.iter().map(value_to_inline).collect())
        }
        Value::Block(block) => {
            let mut table = toml_edit::InlineTable::new();
            for node in block {
                if table.contains_key(&node.key) {
                    continue;
                }
                table.insert(node.key.as_str(), value_to_inline(&node.value));
            }
            toml_edit::Value::InlineTable(table)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reparse(toml: &str) -> DocumentMut {
        toml.parse::<DocumentMut>().unwrap()
    }

    #[test]
    fn test_encode_structure() {
        let doc = libup::parse("name John\nport!int 8080\nserver {\n  host localhost\n}\nitems [\na\nb\n]");
        let out = reparse(&encode(&doc));

        assert_eq!(out["name"].as_str(), Some("John"));
        assert_eq!(out["port"].as_str(), Some("8080"));
        assert_eq!(out["server"]["host"].as_str(), Some("localhost"));
        let items = out["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items.get(0).and_then(|v| v.as_str()), Some("a"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let doc = libup::parse("x first\nx second");
        let out = reparse(&encode(&doc));
        assert_eq!(out["x"].as_str(), Some("first"));
    }

    #[test]
    fn test_encode_value_requires_block() {
        assert!(encode_value(&Value::from("text")).is_err());

        let doc = libup::parse("b {\n  k v\n}");
        let block = &doc.get("b").unwrap().value;
        let out = reparse(&encode_value(block).unwrap());
        assert_eq!(out["k"].as_str(), Some("v"));
    }

    #[test]
    fn test_nested_list_items_are_kept() {
        let mut inner = libup::Block::new();
        inner.insert("k", Value::from("v"));
        inner.insert("k", Value::from("ignored"));

        let mut block = libup::Block::new();
        block.insert(
            "items",
            Value::List(vec![
                Value::from("a"),
                Value::List(vec![Value::from("b"), Value::list()]),
                Value::Block(inner),
            ]),
        );

        let out = reparse(&encode_value(&Value::Block(block)).unwrap());
        let items = out["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items.get(0).and_then(|v| v.as_str()), Some("a"));

        let nested = items.get(1).and_then(|v| v.as_array()).unwrap();
        assert_eq!(nested.len(), 2);
        assert!(nested.get(1).and_then(|v| v.as_array()).unwrap().is_empty());

        let table = items.get(2).and_then(|v| v.as_inline_table()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("k").and_then(|v| v.as_str()), Some("v"));
    }
}
