//! Repository port for project and task persistence and querying.
//!
//! The repository enforces no business rules beyond existence: length
//! limits, capacity limits, and name uniqueness all belong to the service
//! layer. Every read returns an independent copy of the stored state;
//! mutating a returned entity never affects the store.

use crate::project::domain::{
    Description, Project, ProjectId, ProjectName, Task, TaskChanges, TaskId, TaskStatus, TaskTitle,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Kind of entity referenced by a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A project record.
    Project,
    /// A task record.
    Task,
}

impl EntityKind {
    /// Returns the display name of the entity kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The referenced project or task does not exist.
    #[error("{kind} with id {id} does not exist")]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Identifier that failed to resolve.
        id: i32,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Builds a not-found error for a project id.
    #[must_use]
    pub const fn project_not_found(id: ProjectId) -> Self {
        Self::NotFound {
            kind: EntityKind::Project,
            id: id.value(),
        }
    }

    /// Builds a not-found error for a task id.
    #[must_use]
    pub const fn task_not_found(id: TaskId) -> Self {
        Self::NotFound {
            kind: EntityKind::Task,
            id: id.value(),
        }
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Storage contract for projects and the tasks they own.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project under a freshly assigned id.
    async fn create_project(
        &self,
        name: &ProjectName,
        description: &Description,
    ) -> RepositoryResult<Project>;

    /// Returns all projects ordered by creation time ascending.
    async fn list_projects(&self) -> RepositoryResult<Vec<Project>>;

    /// Returns the project with the given id, tasks included.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project does not
    /// exist.
    async fn find_project_by_id(&self, id: ProjectId) -> RepositoryResult<Project>;

    /// Returns the project with the given name, or `None` when no project
    /// matches.
    ///
    /// Absence is an expected outcome here (duplicate checking), not an
    /// error.
    async fn find_project_by_name(&self, name: &ProjectName)
    -> RepositoryResult<Option<Project>>;

    /// Replaces a project's name and description.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update_project(
        &self,
        id: ProjectId,
        new_name: &ProjectName,
        new_description: &Description,
    ) -> RepositoryResult<Project>;

    /// Deletes a project and every task it owns.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project does not
    /// exist.
    async fn delete_project(&self, id: ProjectId) -> RepositoryResult<()>;

    /// Stores a new task inside an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project does not
    /// exist.
    async fn create_task(
        &self,
        project_id: ProjectId,
        title: &TaskTitle,
        description: &Description,
        deadline: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Task>;

    /// Moves a task to a new status, maintaining its closing timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project or the task
    /// does not exist.
    async fn update_task_status(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> RepositoryResult<Task>;

    /// Applies a full task edit verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project or the task
    /// does not exist.
    async fn update_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        changes: TaskChanges,
    ) -> RepositoryResult<Task>;

    /// Deletes a task from its project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the project or the task
    /// does not exist.
    async fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> RepositoryResult<()>;

    /// Returns every task across all projects whose deadline is set and in
    /// the past and whose status is not [`TaskStatus::Done`].
    async fn find_overdue_tasks(&self) -> RepositoryResult<Vec<Task>>;
}
