//! UP value representation.

use std::fmt;
use std::slice;

/// A UP value.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    /// Plain single-line text or the body of a multiline string.
    String(String),
    /// Ordered key/value entries between `{` and `}`.
    Block(Block),
    /// Ordered text items between `[` and `]`.
    List(Vec<Value>),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create an empty block.
    pub fn block() -> Self {
        Value::Block(Block::new())
    }

    /// Create an empty list.
    pub fn list() -> Self {
        Value::List(Vec::new())
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Value::Block(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the block if this is a `Block`.
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Value::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Returns a mutable reference to the block if this is a `Block`.
    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Value::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Returns a reference to the items if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns a mutable reference to the items if this is a `List`.
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Block(block) => fmt::Debug::fmt(block, f),
            Value::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Block> for Value {
    fn from(block: Block) -> Self {
        Value::Block(block)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// A single entry: key, optional type annotation, and value.
///
/// The annotation is the text after `!` in the key segment (`age!int`). It is
/// stored as written and never used to convert the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub key: String,
    pub annotation: Option<String>,
    pub value: Value,
}

impl Node {
    pub fn new(key: impl Into<String>, annotation: Option<&str>, value: Value) -> Self {
        Self {
            key: key.into(),
            annotation: annotation.map(String::from),
            value,
        }
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }
}

/// An ordered sequence of nodes.
///
/// Keys are not unique. Every occurrence is kept in source order and lookups
/// return the first match.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Block {
    nodes: Vec<Node>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unannotated entry. An existing entry with the same key is
    /// left in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.nodes.push(Node::new(key, None, value));
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Value of the first entry with this key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.get_node(key).map(|node| &node.value)
    }

    /// First entry with this key.
    pub fn get_node(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get_node(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.key.as_str())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.nodes.iter().map(|node| (&node.key, &node.value)))
            .finish()
    }
}

impl From<Vec<Node>> for Block {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Node;
    type IntoIter = slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
