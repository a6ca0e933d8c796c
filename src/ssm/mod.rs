// fernctl/src/ssm/mod.rs
pub(crate) mod client;
#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod pages;

use async_trait::async_trait;

use crate::errors::{AppError, Result};

pub use client::AwsParameterStore;
pub use pages::PathPages;

/// Key prefix selecting "everything recursively under this path".
pub const PATH_SELECTOR: &str = "path:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One page of a recursive by-path listing.
#[derive(Debug, Clone, Default)]
pub struct ParameterPage {
    pub parameters: Vec<Parameter>,
    pub next_token: Option<String>,
}

/// Result of a single delete-batch call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteOutcome {
    pub deleted: Vec<String>,
    pub invalid: Vec<String>,
}

/// What a `get`/`delete` key refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterTarget {
    /// Every parameter recursively under the path.
    Path(String),
    /// Exactly one named parameter.
    Name(String),
}

impl ParameterTarget {
    pub fn parse(key: &str) -> Result<Self> {
        match key.strip_prefix(PATH_SELECTOR) {
            Some("") => Err(AppError::Argument(format!(
                "'{}' must be followed by a path",
                PATH_SELECTOR
            ))),
            Some(path) => Ok(ParameterTarget::Path(path.to_string())),
            None if key.is_empty() => Err(AppError::Argument("parameter name is empty".to_string())),
            None => Ok(ParameterTarget::Name(key.to_string())),
        }
    }
}

/// Operations fernctl needs from a hierarchical parameter store.
///
/// Every value is read with decryption and written as a secure string.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn get_parameter(&self, name: &str) -> Result<Parameter>;

    /// Fetches one page of parameters recursively under `path`.
    async fn get_parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<ParameterPage>;

    /// Creates or overwrites `name` as an encrypted parameter.
    async fn put_secure_parameter(&self, name: &str, value: &str) -> Result<()>;

    async fn add_tag(&self, name: &str, tag: &Tag) -> Result<()>;

    async fn list_tags(&self, name: &str) -> Result<Vec<Tag>>;

    async fn delete_parameter(&self, name: &str) -> Result<()>;

    async fn delete_parameters(&self, names: &[String]) -> Result<BatchDeleteOutcome>;
}
