//! Length-validated text value objects shared by projects and tasks.

use super::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project name, at most 30 characters and unique across all projects.
///
/// Uniqueness is a service-level rule; this type only guards the length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Maximum number of characters in a project name.
    pub const MAX_CHARS: usize = 30;

    /// Creates a validated project name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ProjectNameTooLong`] when the value exceeds
    /// [`Self::MAX_CHARS`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();
        let length = raw.chars().count();
        if length > Self::MAX_CHARS {
            return Err(DomainError::ProjectNameTooLong(length));
        }
        Ok(Self(raw))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task title, at most 30 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Maximum number of characters in a task title.
    pub const MAX_CHARS: usize = 30;

    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TaskTitleTooLong`] when the value exceeds
    /// [`Self::MAX_CHARS`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();
        let length = raw.chars().count();
        if length > Self::MAX_CHARS {
            return Err(DomainError::TaskTitleTooLong(length));
        }
        Ok(Self(raw))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form description, at most 150 characters. The empty string stands
/// for "no description".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    /// Maximum number of characters in a description.
    pub const MAX_CHARS: usize = 150;

    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DescriptionTooLong`] when the value exceeds
    /// [`Self::MAX_CHARS`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();
        let length = raw.chars().count();
        if length > Self::MAX_CHARS {
            return Err(DomainError::DescriptionTooLong(length));
        }
        Ok(Self(raw))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when no description was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
