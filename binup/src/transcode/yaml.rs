//! YAML transcoding: convert UP documents to YAML text.
//!
//! Mapping from UP to YAML:
//!   - Value::String       -> YAML string
//!   - Value::List         -> YAML sequence
//!   - Value::Block        -> YAML mapping (source order)
//!   - Document            -> YAML mapping (source order)
//!   - `key!tag value`     -> YAML tagged value (`key: !tag value`)
//!
//! Lossy edges:
//!   - YAML mappings have unique keys; the first node for a key wins, the
//!     same node a lookup would return.
//!   - An empty annotation (`key! value`) has no YAML tag and is dropped.
//!   - Annotation characters outside the YAML tag character set (flow
//!     indicators, `!`, `%`, spaces, non-ASCII) are percent-encoded per
//!     UTF-8 byte, so `a!x,y v` becomes `a: !x%2Cy v`.

use libup::{Document, Node, Value};

/// Encode a UP document as a YAML string.
pub fn encode(doc: &Document) -> Result<String, String> {
    let yaml_value = nodes_to_yaml(doc.nodes());
    serde_yaml::to_string(&yaml_value).map_err(|e| format!("YAML encode error: {}", e))
}

/// Encode a single UP value as a YAML string.
pub fn encode_value(value: &Value) -> Result<String, String> {
    serde_yaml::to_string(&value_to_yaml(value))
        .map_err(|e| format!("YAML encode error: {}", e))
}

fn nodes_to_yaml(nodes: &[Node]) -> serde_yaml::Value {
    let mut map = serde_yaml::Mapping::new();
    for node in nodes {
        let key = serde_yaml::Value::String(node.key.clone());
        if map.contains_key(&key) {
            continue;
        }
        map.insert(key, node_to_yaml(node));
    }
    serde_yaml::Value::Mapping(map)
}

fn node_to_yaml(node: &Node) -> serde_yaml::Value {
    let value = value_to_yaml(&node.value);
    match node.annotation() {
        Some(tag) if !tag.is_empty() => {
            serde_yaml::Value::Tagged(Box::new(serde_yaml::value::TaggedValue {
                tag: serde_yaml::value::Tag::new(escape_tag(tag)),
                value,
            }))
        }
        _ => value,
    }
}

/// Percent-encode everything but the characters a YAML emitter writes
/// verbatim inside a tag.
fn escape_tag(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    for c in tag.chars() {
        if c.is_ascii_alphanumeric() || "-_;/?:@&=+$.~*'()".contains(c) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    out
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Block(block) => nodes_to_yaml(block.nodes()),
        Value::List(items) => serde_yaml::Value::Sequence(items.iter().map(value_to_yaml).collect()),
    }
}
