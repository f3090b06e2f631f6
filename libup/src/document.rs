//! Top-level UP document.

use crate::value::Node;
use std::slice;

/// The nodes of one parsed input, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// First node with this key. Later nodes with the same key are only
    /// reachable through iteration.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.key == key)
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

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Node;
    type IntoIter = slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_get_returns_first_match() {
        let mut doc = Document::new();
        doc.push(Node::new("x", None, Value::from("1")));
        doc.push(Node::new("x", Some("int"), Value::from("2")));

        let node = doc.get("x").unwrap();
        assert_eq!(node.value.as_str(), Some("1"));
        assert_eq!(node.annotation(), None);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_get_missing() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert!(doc.get("x").is_none());
    }

    #[test]
    fn test_get_is_exact() {
        let mut doc = Document::new();
        doc.push(Node::new("Name", None, Value::from("a")));
        assert!(doc.get("name").is_none());
        assert!(doc.get("Name ").is_none());
        assert!(doc.get("Name").is_some());
    }
}
