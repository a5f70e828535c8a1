// src/error.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parse::ParseError;

/// Hard failures. Nothing is written for a document that produced one.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Recoverable anomalies met while reflowing. Processing always continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("tag <{tag}> is neither block nor inline, laid out inline")]
    UnclassifiedTag { tag: String },

    #[error("attribute '{attribute}' of <{tag}> is not in the configured order, dropped")]
    UnexpectedAttribute { tag: String, attribute: String },

    #[error("text outside any leveled block, placed at level {fallback}")]
    MissingLevel { fallback: usize },
}
