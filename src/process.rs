// src/process.rs
//
// File-level steps around the core, one isolated unit per file:
//   read → parse → canonicalize root → format → backup → write.
// A document that fails to read or parse leaves no backup and no output behind.
//
// - Root element "spdx" is renamed to "SPDX".
// - Root gets prettyprinted="<local time %Y%m%d%H%M%S>" unless disabled.
// - Backup: the original bytes copied to "<file><ext>" (default ".backup").

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Error;
use crate::node::Node;
use crate::parse::parse;
use crate::{format_document, Formatted};

pub const CANONICAL_ROOT: &str = "SPDX";
pub const TIMESTAMP_ATTRIBUTE: &str = "prettyprinted";
pub const DEFAULT_BACKUP_EXT: &str = ".backup";

#[derive(Debug, Clone)]
pub struct Options {
    pub config: Config,
    /// Suffix for the backup copy; `None` disables it.
    pub backup_ext: Option<String>,
    /// Stamp the root with the time of formatting.
    pub timestamp: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: Config::default(),
            backup_ext: Some(DEFAULT_BACKUP_EXT.to_string()),
            timestamp: true,
        }
    }
}

pub fn timestamp_now() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

pub fn canonicalize_root(root: &mut Node, timestamp: Option<&str>) {
    if root.tag == CANONICAL_ROOT.to_ascii_lowercase() {
        info!("changing root element to {CANONICAL_ROOT} (capital letters)");
        root.tag = CANONICAL_ROOT.to_string();
    }
    if let Some(ts) = timestamp {
        root.set(TIMESTAMP_ATTRIBUTE, ts);
    }
}

/// Parse, canonicalize and format one document held in memory.
pub fn format_source(src: &[u8], options: &Options) -> Result<Formatted, Error> {
    let mut root = parse(src)?;
    let ts = options.timestamp.then(timestamp_now);
    canonicalize_root(&mut root, ts.as_deref());
    Ok(format_document(&root, &options.config))
}

/// "<path><ext>", e.g. "MIT.xml" → "MIT.xml.backup".
pub fn backup_path(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(ext);
    PathBuf::from(name)
}

pub fn read_source(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Format `path` in place, keeping a backup of the original bytes.
pub fn process_file(path: &Path, options: &Options) -> Result<Formatted, Error> {
    let src = read_source(path)?;
    let formatted = format_source(&src, options)?;

    if let Some(ext) = &options.backup_ext {
        let backup = backup_path(path, ext);
        fs::write(&backup, &src).map_err(|e| Error::io(&backup, e))?;
        debug!(backup = %backup.display(), "wrote backup");
    }
    fs::write(path, &formatted.text).map_err(|e| Error::io(path, e))?;
    Ok(formatted)
}
