//! Error types for domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The project name exceeds the 30-character limit.
    #[error("project name must be 30 characters or fewer, got {0}")]
    ProjectNameTooLong(usize),

    /// The task title exceeds the 30-character limit.
    #[error("task title must be 30 characters or fewer, got {0}")]
    TaskTitleTooLong(usize),

    /// The description exceeds the 150-character limit.
    #[error("description must be 150 characters or fewer, got {0}")]
    DescriptionTooLong(usize),

    /// The deadline text is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid deadline '{0}', expected YYYY-MM-DD")]
    InvalidDeadline(String),

    /// The status text is outside the closed `todo`/`doing`/`done` set.
    #[error("task status must be one of 'todo', 'doing' or 'done', got '{0}'")]
    UnknownStatus(String),
}

/// Error returned while parsing task statuses from untrusted input or
/// persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

impl From<ParseTaskStatusError> for DomainError {
    fn from(err: ParseTaskStatusError) -> Self {
        Self::UnknownStatus(err.0)
    }
}
