// src/lib.rs
//
// xmlindent: reflow tagged XML documents into canonical indented, wrapped text.
//
// Pipeline for one document:
//   parse        bytes → Node tree
//   reflow       Node tree → (level, paragraph) records, per the block/inline tag tables
//   wrap         paragraph → minimum-raggedness lines within width - level * indent
//   render       lines → indented, '\n'-terminated output
// `process` adds the file-level steps around it: root canonicalization, the
// generation timestamp, the backup copy and the write-back.
//
// The core (reflow, wrap, render) is pure: configuration comes in as an explicit
// `Config`, warnings come back in the result.

pub mod classify;
pub mod config;
pub mod error;
pub mod node;
pub mod parse;
pub mod process;
pub mod reflow;
pub mod render;
pub mod wrap;

use tracing::debug;

pub use classify::{TagClass, TagTable};
pub use config::Config;
pub use error::{Error, Warning};
pub use node::Node;
pub use parse::{parse, ParseError};
pub use reflow::{normalize, reflow, LeveledBlock, Reflowed};
pub use render::{render, render_document};
pub use wrap::break_lines;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    pub warnings: Vec<Warning>,
}

pub fn format_document(root: &Node, config: &Config) -> Formatted {
    let Reflowed { blocks, warnings } = reflow(root, 0, &config.tags);
    debug!(
        blocks = blocks.len(),
        warnings = warnings.len(),
        "reflowed <{}>",
        root.tag
    );
    let text = render_document(&blocks, config.width, config.indent);
    Formatted { text, warnings }
}
