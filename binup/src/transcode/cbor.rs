//! CBOR transcoding: convert UP documents to CBOR binary data.
//!
//! Mapping from UP to CBOR:
//!   - Value::String  -> CBOR text string
//!   - Value::List    -> CBOR array (determinate length)
//!   - Value::Block   -> CBOR map (determinate length, text string keys)
//!   - Document       -> CBOR map
//!
//! Map entries keep source order. The first node for a key wins and type
//! annotations are dropped.

use ciborium::value::Value as CborValue;
use libup::{Document, Node, Value};

/// Encode a UP document as CBOR bytes.
pub fn encode(doc: &Document) -> Result<Vec<u8>, String> {
    write(&nodes_to_cbor(doc.nodes()))
}

/// Encode a single UP value as CBOR bytes.
pub fn encode_value(value: &Value) -> Result<Vec<u8>, String> {
    write(&value_to_cbor(value))
}

fn write(value: &CborValue) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf).map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn nodes_to_cbor(nodes: &[Node]) -> CborValue {
    let mut seen: Vec<&str> = Vec::new();
    let mut pairs = Vec::new();
    for node in nodes {
        if seen.contains(&node.key.as_str()) {
            continue;
        }
        seen.push(&node.key);
        pairs.push((
            CborValue::Text(node.key.clone()),
            value_to_cbor(&node.value),
        ));
    }
    CborValue::Map(pairs)
}

fn value_to_cbor(value: &Value) -> CborValue {
    match value {
        Value::String(s) => CborValue::Text(s.clone()),
        Value::Block(block) => nodes_to_cbor(block.nodes()),
        Value::List(items) => CborValue::Array(items.iter().map(value_to_cbor).collect()),
    }
}
