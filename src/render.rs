// src/render.rs
//
// Leveled blocks → final text. Each block is wrapped to the width left after its
// indentation (never less than one column), every line is prefixed with
// `level * indent` spaces and terminated by '\n'.

use crate::reflow::LeveledBlock;
use crate::wrap::break_lines;

pub fn render(level: usize, lines: &[String], indent_width: usize) -> Vec<String> {
    let prefix = " ".repeat(level.saturating_mul(indent_width));
    lines.iter().map(|line| format!("{prefix}{line}")).collect()
}

/// Columns available to the text of a block at `level`.
pub fn available_width(level: usize, width: usize, indent_width: usize) -> usize {
    width
        .saturating_sub(level.saturating_mul(indent_width))
        .max(1)
}

pub fn render_document(blocks: &[LeveledBlock], width: usize, indent_width: usize) -> String {
    let mut out = String::new();
    for block in blocks {
        let lines = break_lines(
            &block.paragraph,
            available_width(block.level, width, indent_width),
        );
        for line in render(block.level, &lines, indent_width) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}
