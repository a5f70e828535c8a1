// src/node.rs
//
// Element tree in the ElementTree shape:
//   <tag a="1">text<child/>child-tail</tag>tail
// `text` is the character data before the first child, `tail` the character data
// after the element's end tag and before its next sibling.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub text: Option<String>,
    pub tail: Option<String>,
    /// Input order is kept; equality ignores it.
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Insert or replace an attribute; a replaced attribute keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut node = Node::new("SPDX")
            .with_attribute("name", "MIT License")
            .with_attribute("identifier", "MIT");
        node.set("name", "MIT");
        let keys: Vec<&str> = node.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "identifier"]);
        assert_eq!(node.get("name"), Some("MIT"));
    }

    #[test]
    fn attribute_order_does_not_affect_equality() {
        let a = Node::new("alt").with_attribute("name", "x").with_attribute("match", ".+");
        let b = Node::new("alt").with_attribute("match", ".+").with_attribute("name", "x");
        assert_eq!(a, b);
    }
}
