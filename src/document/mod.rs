// fernctl/src/document/mod.rs
//! In-memory form of a YAML configuration file.
//!
//! A [`Document`] keeps every YAML node kind visible so that the flattener can
//! reject non-string leaves with a typed error instead of silently coercing
//! them.

pub(crate) mod flatten;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde_yaml::Value;
use thiserror::Error;

use crate::errors::{AppError, Result};

pub use flatten::flatten;

pub type DocumentMap = BTreeMap<String, Document>;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Scalar(Scalar),
    List(Vec<Document>),
    Map(DocumentMap),
}

/// Node kind, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    String,
    Number,
    Bool,
    Null,
    List,
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Bool => "boolean",
            NodeKind::Null => "null",
            NodeKind::List => "list",
            NodeKind::Map => "map",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document is empty")]
    Empty,

    #[error("top-level node must be a map, found {found}")]
    RootNotMap { found: NodeKind },

    #[error("map key under '{parent}' must be a string")]
    NonStringKey { parent: String },

    #[error("tagged value at '{path}' is not supported")]
    Tagged { path: String },

    #[error("value at '{path}' must be a string, found {found}")]
    NonStringLeaf { path: String, found: NodeKind },

    #[error("list element at '{path}' must be a map, found {found}")]
    ListElementNotMap { path: String, found: NodeKind },
}

impl Document {
    pub fn kind(&self) -> NodeKind {
        match self {
            Document::Scalar(Scalar::String(_)) => NodeKind::String,
            Document::Scalar(Scalar::Number(_)) => NodeKind::Number,
            Document::Scalar(Scalar::Bool(_)) => NodeKind::Bool,
            Document::Scalar(Scalar::Null) => NodeKind::Null,
            Document::List(_) => NodeKind::List,
            Document::Map(_) => NodeKind::Map,
        }
    }

    /// Converts a parsed YAML value. `path` only feeds error messages.
    fn from_yaml(value: Value, path: &str) -> std::result::Result<Self, DocumentError> {
        match value {
            Value::Null => Ok(Document::Scalar(Scalar::Null)),
            Value::Bool(b) => Ok(Document::Scalar(Scalar::Bool(b))),
            Value::Number(n) => Ok(Document::Scalar(Scalar::Number(n.to_string()))),
            Value::String(s) => Ok(Document::Scalar(Scalar::String(s))),
            Value::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| Document::from_yaml(item, &format!("{path}/{i}")))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Document::List),
            Value::Mapping(mapping) => {
                let mut map = DocumentMap::new();
                for (key, value) in mapping {
                    let Value::String(key) = key else {
                        return Err(DocumentError::NonStringKey {
                            parent: display_path(path),
                        });
                    };
                    let child = Document::from_yaml(value, &format!("{path}/{key}"))?;
                    map.insert(key, child);
                }
                Ok(Document::Map(map))
            }
            Value::Tagged(_) => Err(DocumentError::Tagged {
                path: display_path(path),
            }),
        }
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "/".to_string() } else { path.to_string() }
}

/// Parses YAML text whose top-level node must be a map.
pub fn parse_str(text: &str) -> Result<DocumentMap> {
    if text.trim().is_empty() {
        return Err(DocumentError::Empty.into());
    }
    let mut value: Value = serde_yaml::from_str(text)?;
    value.apply_merge()?;
    if value.is_null() {
        return Err(DocumentError::Empty.into());
    }
    match Document::from_yaml(value, "")? {
        Document::Map(map) => Ok(map),
        other => Err(DocumentError::RootNotMap { found: other.kind() }.into()),
    }
}

pub fn load_file(path: &Path) -> Result<DocumentMap> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&text)
}
