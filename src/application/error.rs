//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("guide file not found: {0}")]
    GuideNotFound(PathBuf),

    #[error("malformed guide {path}: {message}")]
    MalformedGuide { path: PathBuf, message: String },

    #[error("malformed catalog {path}: {message}")]
    MalformedCatalog { path: PathBuf, message: String },

    #[error("node not found in guide: {0}")]
    NodeNotFound(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
