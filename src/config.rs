// src/config.rs
//
// Immutable run configuration. Built once (defaults, optional TOML file, CLI
// overrides) and passed by reference into every entry point.
//
// TOML layout:
//   width = 80
//   indent = 2
//   [tags]
//   inline = ["b", "br"]
//   block = ["p", "SPDX"]
//   [tags.attributes]
//   SPDX = ["name", "identifier"]
// Every key is optional; an omitted key keeps its default.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::classify::TagTable;
use crate::error::Error;

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_INDENT: usize = 2;
pub const MAX_INDENT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target line width, indentation included.
    pub width: usize,
    /// Spaces per block nesting level.
    pub indent: usize,
    pub tags: TagTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            indent: DEFAULT_INDENT,
            tags: TagTable::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let src = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = toml::from_str(&src).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 {
            return Err(Error::InvalidConfig("width must be at least 1".into()));
        }
        if self.indent > MAX_INDENT {
            return Err(Error::InvalidConfig(format!(
                "indent must be at most {MAX_INDENT}"
            )));
        }
        let conflicts: Vec<&str> = self.tags.conflicts().collect();
        if !conflicts.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "tags listed as both block and inline: {}",
                conflicts.join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::TagClass;

    #[test]
    fn empty_file_keeps_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config: Config = toml::from_str(
            r#"
            width = 60
            [tags]
            inline = ["em"]
            "#,
        )
        .unwrap();
        assert_eq!(config.width, 60);
        assert_eq!(config.indent, DEFAULT_INDENT);
        assert_eq!(config.tags.classify("em"), TagClass::Inline);
        assert_eq!(config.tags.classify("b"), TagClass::Unclassified);
        assert_eq!(config.tags.classify("p"), TagClass::Block);
        assert_eq!(config.tags.attribute_order("alt"), ["name", "match"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("colour = true").is_err());
    }

    #[test]
    fn validate_rejects_zero_width_huge_indent_and_overlap() {
        let zero = Config {
            width: 0,
            ..Config::default()
        };
        assert!(matches!(zero.validate(), Err(Error::InvalidConfig(_))));

        let huge = Config {
            indent: usize::MAX / 2 + 1,
            ..Config::default()
        };
        let err = huge.validate().unwrap_err();
        assert!(err.to_string().contains("indent must be at most 64"));

        let widest = Config {
            indent: MAX_INDENT,
            ..Config::default()
        };
        assert!(widest.validate().is_ok());

        let mut overlap = Config::default();
        overlap.tags.inline.insert("p".into());
        let err = overlap.validate().unwrap_err();
        assert!(err.to_string().contains("p"));
    }

    #[test]
    fn load_reports_path_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xmlindent.toml");
        fs::write(&path, "width = \"wide\"").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigFile { .. }));
        assert!(err.to_string().contains("xmlindent.toml"));
    }
}
