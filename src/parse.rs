// src/parse.rs
//
// Minimal XML reader producing a `Node` tree.
//
// - Skipped: XML declaration and processing instructions, comments, <!DOCTYPE ...>
//   (bracket- and quote-aware, internal subsets are not interpreted).
// - CDATA sections become literal character data.
// - Entities: &amp; &lt; &gt; &quot; &apos; plus numeric references (&#38; &#x26;).
//   Anything else is an error: custom entities would need the DTD.
// - Attribute values: single or double quoted; literal tab/CR/LF become spaces.
// - Character data before an element's first child is its `text`; character data
//   after a child's end tag is that child's `tail`. Comments do not split either.
// - Only whitespace may appear outside the root element.
//
// UTF-8 only. All delimiters are ASCII, so every slice taken at them is on a
// char boundary.

use std::borrow::Cow;

use memchr::{memchr, memmem};
use thiserror::Error;

use crate::node::Node;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input is not valid UTF-8 (byte {offset})")]
    InvalidUtf8 { offset: usize },

    #[error("unexpected end of input inside {context}")]
    UnexpectedEof { context: &'static str },

    #[error("malformed tag at byte {offset}")]
    MalformedTag { offset: usize },

    #[error("mismatched end tag at byte {offset}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        offset: usize,
        expected: String,
        found: String,
    },

    #[error("end tag </{found}> at byte {offset} has no open element")]
    UnexpectedEndTag { offset: usize, found: String },

    #[error("element <{tag}> is never closed")]
    Unclosed { tag: String },

    #[error("unknown entity '&{name};' at byte {offset}")]
    UnknownEntity { offset: usize, name: String },

    #[error("duplicate attribute '{name}' at byte {offset}")]
    DuplicateAttribute { offset: usize, name: String },

    #[error("content outside the root element at byte {offset}")]
    OutsideRoot { offset: usize },

    #[error("document has no root element")]
    NoRoot,
}

pub fn parse(src: &[u8]) -> Result<Node, ParseError> {
    let text = std::str::from_utf8(src).map_err(|e| ParseError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    parse_str(text)
}

pub fn parse_str(src: &str) -> Result<Node, ParseError> {
    Reader {
        src,
        pos: 0,
        open: Vec::new(),
        root: None,
    }
    .run()
}

/* ============================ Utility predicates ========================= */

#[inline]
fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.') || b >= 0x80
}

#[inline]
fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r'
}

fn find(s: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    memmem::find(&s[from..], needle).map(|p| from + p)
}

/// Find the '>' for a tag starting at `i` (s[i] == '<'), being quote-aware.
fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    i += 1;
    let mut quote: u8 = 0;
    while i < n {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == b'>' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Like `find_tag_end`, but a '>' inside `[...]` (DOCTYPE internal subset) does not count.
fn find_declaration_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    i += 2;
    let mut quote: u8 = 0;
    let mut depth = 0usize;
    while i < n {
        let b = s[i];
        if quote != 0 {
            if b == quote {
                quote = 0;
            }
        } else if b == b'"' || b == b'\'' {
            quote = b;
        } else if b == b'[' {
            depth += 1;
        } else if b == b']' {
            depth = depth.saturating_sub(1);
        } else if b == b'>' && depth == 0 {
            return Some(i);
        }
        i += 1;
    }
    None
}

/* ================================ Entities =============================== */

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = match name.strip_prefix("#x") {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Replace entity and character references. `offset` is the position of `raw`
/// in the source, for error reporting.
fn decode(raw: &str, offset: usize) -> Result<Cow<'_, str>, ParseError> {
    let bytes = raw.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Ok(Cow::Borrowed(raw));
    };

    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);
    let mut i = first;
    loop {
        let semi = memchr(b';', &bytes[i..]).map(|p| i + p);
        let name = &raw[i + 1..semi.unwrap_or(raw.len())];
        let unknown = || ParseError::UnknownEntity {
            offset: offset + i,
            name: name.to_string(),
        };
        let semi = semi.ok_or_else(unknown)?;
        out.push(resolve_entity(name).ok_or_else(unknown)?);

        let next = semi + 1;
        match memchr(b'&', &bytes[next..]) {
            Some(p) => {
                out.push_str(&raw[next..next + p]);
                i = next + p;
            }
            None => {
                out.push_str(&raw[next..]);
                return Ok(Cow::Owned(out));
            }
        }
    }
}

/* ================================ Tags =================================== */

/// Parse `<name attr="v" ...>` or `<name .../>` spanning `start..=end`.
/// Returns the element and whether it was self-closing.
fn parse_start_tag(src: &str, start: usize, end: usize) -> Result<(Node, bool), ParseError> {
    let s = src.as_bytes();
    let malformed = || ParseError::MalformedTag { offset: start };

    let mut i = start + 1;
    let name_start = i;
    while i < end && is_name_char(s[i]) {
        i += 1;
    }
    if i == name_start {
        return Err(malformed());
    }
    let mut node = Node::new(&src[name_start..i]);

    loop {
        let ws_start = i;
        while i < end && is_ws(s[i]) {
            i += 1;
        }
        if i >= end {
            return Ok((node, false));
        }
        if s[i] == b'/' {
            return if i + 1 == end {
                Ok((node, true))
            } else {
                Err(malformed())
            };
        }
        // attributes must be separated by whitespace
        if i == ws_start {
            return Err(malformed());
        }

        let attr_start = i;
        while i < end && is_name_char(s[i]) {
            i += 1;
        }
        if i == attr_start {
            return Err(malformed());
        }
        let name = &src[attr_start..i];

        while i < end && is_ws(s[i]) {
            i += 1;
        }
        if i >= end || s[i] != b'=' {
            return Err(malformed());
        }
        i += 1;
        while i < end && is_ws(s[i]) {
            i += 1;
        }
        if i >= end || (s[i] != b'"' && s[i] != b'\'') {
            return Err(malformed());
        }
        let quote = s[i];
        let value_start = i + 1;
        let value_end = memchr(quote, &s[value_start..end])
            .map(|p| value_start + p)
            .ok_or_else(malformed)?;

        // Literal whitespace normalizes before references are expanded, so
        // `&#10;` survives as a newline. Same length, so offsets still hold.
        let raw = src[value_start..value_end].replace(['\t', '\n', '\r'], " ");
        let value = decode(&raw, value_start)?;

        if node.attributes.contains_key(name) {
            return Err(ParseError::DuplicateAttribute {
                offset: attr_start,
                name: name.to_string(),
            });
        }
        node.set(name, value.into_owned());
        i = value_end + 1;
    }
}

/* ================================ Reader ================================= */

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    open: Vec<Node>,
    root: Option<Node>,
}

impl<'a> Reader<'a> {
    fn run(mut self) -> Result<Node, ParseError> {
        let src = self.src;
        let s = src.as_bytes();
        let n = s.len();

        while self.pos < n {
            let i = self.pos;

            if s[i] != b'<' {
                let next_lt = memchr(b'<', &s[i..]).map(|off| i + off).unwrap_or(n);
                let chars = decode(&src[i..next_lt], i)?;
                self.character_data(&chars, i)?;
                self.pos = next_lt;
                continue;
            }

            let rest = &s[i..];
            if rest.starts_with(b"<!--") {
                let end = find(s, i + 4, b"-->").ok_or(ParseError::UnexpectedEof {
                    context: "comment",
                })?;
                self.pos = end + 3;
            } else if rest.starts_with(b"<![CDATA[") {
                let start = i + 9;
                let end = find(s, start, b"]]>").ok_or(ParseError::UnexpectedEof {
                    context: "CDATA section",
                })?;
                self.character_data(&src[start..end], i)?;
                self.pos = end + 3;
            } else if rest.starts_with(b"<?") {
                let end = find(s, i + 2, b"?>").ok_or(ParseError::UnexpectedEof {
                    context: "processing instruction",
                })?;
                self.pos = end + 2;
            } else if rest.starts_with(b"<!") {
                let end = find_declaration_end(s, i).ok_or(ParseError::UnexpectedEof {
                    context: "declaration",
                })?;
                self.pos = end + 1;
            } else if rest.starts_with(b"</") {
                self.end_tag(i)?;
            } else {
                self.start_tag(i)?;
            }
        }

        if let Some(node) = self.open.last() {
            return Err(ParseError::Unclosed {
                tag: node.tag.clone(),
            });
        }
        self.root.ok_or(ParseError::NoRoot)
    }

    fn character_data(&mut self, chars: &str, offset: usize) -> Result<(), ParseError> {
        if chars.is_empty() {
            return Ok(());
        }
        let Some(parent) = self.open.last_mut() else {
            if chars.bytes().all(is_ws) {
                return Ok(());
            }
            return Err(ParseError::OutsideRoot { offset });
        };
        let slot = match parent.children.last_mut() {
            Some(child) => &mut child.tail,
            None => &mut parent.text,
        };
        slot.get_or_insert_with(String::new).push_str(chars);
        Ok(())
    }

    fn start_tag(&mut self, i: usize) -> Result<(), ParseError> {
        let src = self.src;
        if self.open.is_empty() && self.root.is_some() {
            return Err(ParseError::OutsideRoot { offset: i });
        }
        let end = find_tag_end(src.as_bytes(), i).ok_or(ParseError::UnexpectedEof {
            context: "start tag",
        })?;
        let (node, self_closing) = parse_start_tag(src, i, end)?;
        if self_closing {
            self.close(node);
        } else {
            self.open.push(node);
        }
        self.pos = end + 1;
        Ok(())
    }

    fn end_tag(&mut self, i: usize) -> Result<(), ParseError> {
        let src = self.src;
        let s = src.as_bytes();
        let end = memchr(b'>', &s[i..])
            .map(|p| i + p)
            .ok_or(ParseError::UnexpectedEof { context: "end tag" })?;

        let mut j = i + 2;
        while j < end && is_name_char(s[j]) {
            j += 1;
        }
        let name = &src[i + 2..j];
        if name.is_empty() || !s[j..end].iter().all(|&b| is_ws(b)) {
            return Err(ParseError::MalformedTag { offset: i });
        }

        let node = self.open.pop().ok_or_else(|| ParseError::UnexpectedEndTag {
            offset: i,
            found: name.to_string(),
        })?;
        if node.tag != name {
            return Err(ParseError::MismatchedTag {
                offset: i,
                expected: node.tag,
                found: name.to_string(),
            });
        }
        self.close(node);
        self.pos = end + 1;
        Ok(())
    }

    fn close(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
    }
}
