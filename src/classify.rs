// src/classify.rs
//
// Tag tables: which tags sit on their own lines (block), which flow with the
// text around them (inline), and the order attributes are written in.
// Lookups are exact and case-sensitive ("SPDX" and "spdx" are different tags).

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Block,
    Inline,
    /// Missing from both tables. Laid out like `Inline`, reported as a warning.
    Unclassified,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagTable {
    pub inline: BTreeSet<String>,
    pub block: BTreeSet<String>,
    #[serde(rename = "attributes")]
    pub attribute_order: BTreeMap<String, Vec<String>>,
}

impl Default for TagTable {
    fn default() -> Self {
        Self {
            inline: to_set(&["alt", "b", "br", "copyright", "url"]),
            block: to_set(&[
                "body", "header", "li", "license", "list", "notes", "optional", "p", "SPDX",
                "title", "urls",
            ]),
            attribute_order: BTreeMap::from([
                (
                    "SPDX".to_string(),
                    to_vec(&["name", "identifier", "osi-approved", "prettyprinted"]),
                ),
                ("alt".to_string(), to_vec(&["name", "match"])),
            ]),
        }
    }
}

impl TagTable {
    pub fn classify(&self, tag: &str) -> TagClass {
        if self.block.contains(tag) {
            TagClass::Block
        } else if self.inline.contains(tag) {
            TagClass::Inline
        } else {
            TagClass::Unclassified
        }
    }

    /// Preferred attribute order for `tag`; empty when none is configured, in
    /// which case attributes are written in input order.
    pub fn attribute_order(&self, tag: &str) -> &[String] {
        self.attribute_order
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Tags listed as both block and inline.
    pub fn conflicts(&self) -> impl Iterator<Item = &str> {
        self.block.intersection(&self.inline).map(String::as_str)
    }
}

fn to_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn to_vec(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
