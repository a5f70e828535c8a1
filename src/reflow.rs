// src/reflow.rs
//
// Tree → ordered (level, paragraph) records.
//
// - Block element at level L:
//     L   : <tag attrs>
//     L+1 : text, children (inline ones flow, block ones open their own records)
//     L   : </tag>
//   then a fresh record at L, so the tail and following inline siblings flow together.
// - Inline element: markup attaches to the surrounding text, level unchanged, no new record.
//   Its end tag does not start a new record either: inline markup never forces a line
//   break, so the text after </b> may share a line with it.
// - Unclassified element: laid out like inline, reported.
// - Element without text or children: written self-closed (<tag attrs/>). Whitespace-only
//   text still counts as a separator after it.
// - text/tail: whitespace runs collapse to one space, edges trimmed. Whitespace that
//   stood at an edge becomes one pending separator, so "a <b>x</b> c" keeps its spaces.
//   New records drop any pending separator.
// - Empty records are never emitted.
// - The input tree is read only; warnings are collected, never fatal.

use std::borrow::Cow;
use std::collections::HashSet;

use tracing::warn;

use crate::classify::{TagClass, TagTable};
use crate::error::Warning;
use crate::node::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeveledBlock {
    /// Number of block ancestors; inline nesting never counts.
    pub level: usize,
    /// Single-spaced text, ready for line breaking.
    pub paragraph: String,
}

impl LeveledBlock {
    fn new(level: usize) -> Self {
        Self {
            level,
            paragraph: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reflowed {
    pub blocks: Vec<LeveledBlock>,
    pub warnings: Vec<Warning>,
}

/// Trim and collapse every whitespace run to a single space. `None` if nothing is left.
pub fn normalize(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    (!out.is_empty()).then_some(out)
}

pub fn reflow(node: &Node, level: usize, tags: &TagTable) -> Reflowed {
    let mut reflower = Reflower {
        tags,
        entry_level: level,
        current: None,
        pending_space: false,
        out: Reflowed::default(),
    };
    reflower.node(node, level);
    reflower.flush();
    reflower.out
}

/* ============================== Escaping ================================ */

fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn escape_attribute(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\n', '\t', '\r']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\t' => out.push_str("&#9;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/* ============================== Reflower ================================ */

struct Reflower<'a> {
    tags: &'a TagTable,
    /// Level used for text that arrives before any record is open.
    entry_level: usize,
    current: Option<LeveledBlock>,
    pending_space: bool,
    out: Reflowed,
}

impl Reflower<'_> {
    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            if !block.paragraph.is_empty() {
                self.out.blocks.push(block);
            }
        }
    }

    /// Close the current record and start a new one at `level`.
    fn boundary(&mut self, level: usize) {
        self.flush();
        self.current = Some(LeveledBlock::new(level));
        self.pending_space = false;
    }

    fn push(&mut self, fragment: &str) {
        let fallback = self.entry_level;
        if self.current.is_none() {
            warn!(level = fallback, "text outside any leveled block");
            self.out.warnings.push(Warning::MissingLevel { fallback });
        }
        let block = self
            .current
            .get_or_insert_with(|| LeveledBlock::new(fallback));
        if self.pending_space && !block.paragraph.is_empty() {
            block.paragraph.push(' ');
        }
        block.paragraph.push_str(fragment);
        self.pending_space = false;
    }

    fn text(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else { return };
        if raw.starts_with(char::is_whitespace) {
            self.pending_space = true;
        }
        if let Some(text) = normalize(raw) {
            self.push(&escape_text(&text));
        }
        if raw.ends_with(char::is_whitespace) {
            self.pending_space = true;
        }
    }

    /// `<tag attrs`, without the closing `>` or `/>`.
    fn open_tag(&mut self, node: &Node) -> String {
        let mut open = format!("<{}", node.tag);
        let tags = self.tags;
        let order = tags.attribute_order(&node.tag);

        if order.is_empty() {
            for (name, value) in &node.attributes {
                push_attribute(&mut open, name, value);
            }
            return open;
        }

        let mut rendered: HashSet<&str> = HashSet::with_capacity(order.len());
        for name in order {
            if let Some(value) = node.attributes.get(name) {
                push_attribute(&mut open, name, value);
                rendered.insert(name.as_str());
            }
        }
        for name in node.attributes.keys() {
            if !rendered.contains(name.as_str()) {
                warn!(tag = %node.tag, attribute = %name, "attribute not in configured order, dropped");
                self.out.warnings.push(Warning::UnexpectedAttribute {
                    tag: node.tag.clone(),
                    attribute: name.clone(),
                });
            }
        }
        open
    }

    fn node(&mut self, node: &Node, level: usize) {
        let class = self.tags.classify(&node.tag);
        if class == TagClass::Unclassified {
            warn!(tag = %node.tag, "tag is neither block nor inline");
            self.out.warnings.push(Warning::UnclassifiedTag {
                tag: node.tag.clone(),
            });
        }

        let open = self.open_tag(node);
        let empty = node.children.is_empty() && node.text.as_deref().and_then(normalize).is_none();

        match class {
            TagClass::Block => {
                self.boundary(level);
                if empty {
                    self.push(&format!("{open}/>"));
                    self.text(node.text.as_deref());
                } else {
                    self.push(&format!("{open}>"));
                    self.boundary(level + 1);
                    self.text(node.text.as_deref());
                    for child in &node.children {
                        self.node(child, level + 1);
                    }
                    self.boundary(level);
                    self.push(&format!("</{}>", node.tag));
                }
                self.boundary(level);
            }
            TagClass::Inline | TagClass::Unclassified => {
                if empty {
                    self.push(&format!("{open}/>"));
                    self.text(node.text.as_deref());
                } else {
                    self.push(&format!("{open}>"));
                    self.text(node.text.as_deref());
                    for child in &node.children {
                        self.node(child, level);
                    }
                    self.push(&format!("</{}>", node.tag));
                }
            }
        }

        self.text(node.tail.as_deref());
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}
