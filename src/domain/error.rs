//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations.
/// Structural guide problems are not errors: they are collected by
/// `Guide::validate` into a report instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid version string: {0}")]
    InvalidVersion(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("guide has no starting point")]
    NoRoot,

    #[error("invalid choice {index}: node offers {available} answers")]
    InvalidChoice { index: usize, available: usize },

    #[error("session already finished")]
    SessionFinished,
}
