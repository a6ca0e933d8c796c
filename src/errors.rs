use thiserror::Error;

use crate::document::DocumentError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid arguments: {0}")]
    Argument(String),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("{message}")]
    NotFound { name: String, message: String },

    #[error("{operation} failed for {target}: {message}")]
    Remote {
        operation: &'static str,
        target: String,
        message: String,
    },

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn remote(operation: &'static str, target: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Remote {
            operation,
            target: target.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
