//! Business-rule layer for projects and tasks.
//!
//! The service is the sole business-rule authority: length validation,
//! capacity limits, and project-name uniqueness are all decided here,
//! before any repository call, so that invalid input never causes a
//! partial write. Repositories only enforce existence.

use crate::project::{
    domain::{
        Description, DomainError, Project, ProjectId, ProjectName, Task, TaskChanges, TaskId,
        TaskStatus, TaskTitle, parse_deadline,
    },
    ports::{ProjectRepository, RepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Capacity limits supplied by configuration at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLimits {
    /// Maximum number of projects.
    pub max_projects: usize,
    /// Maximum number of tasks per project.
    pub max_tasks: usize,
}

/// Service-level errors for project and task operations.
///
/// The single error type collaborators catch: repository and validation
/// failures pass through transparently, business-rule rejections carry
/// their own variants.
#[derive(Debug, Clone, Error)]
pub enum ProjectServiceError {
    /// Input failed a format, length, or enum constraint.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// Repository operation failed, including entity-not-found lookups.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A project with the requested name already exists.
    #[error("a project named '{0}' already exists")]
    DuplicateProjectName(String),

    /// The configured maximum number of projects is reached.
    #[error("cannot create more than {0} projects")]
    ProjectLimitExceeded(usize),

    /// The project reached its configured maximum number of tasks.
    #[error("project '{name}' cannot have more than {limit} tasks")]
    TaskLimitExceeded {
        /// Name of the full project.
        name: String,
        /// Configured per-project task limit.
        limit: usize,
    },
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Business-rule orchestration service for projects and tasks.
#[derive(Clone)]
pub struct ProjectService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    limits: ServiceLimits,
}

impl<R, C> ProjectService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, limits: ServiceLimits) -> Self {
        Self {
            repository,
            clock,
            limits,
        }
    }

    /// Creates a new project after validating business rules.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Validation`] when a length constraint
    /// fails, [`ProjectServiceError::ProjectLimitExceeded`] at capacity, and
    /// [`ProjectServiceError::DuplicateProjectName`] on a name collision.
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> ProjectServiceResult<Project> {
        let validated_name = ProjectName::new(name)?;
        let validated_description = Description::new(description)?;

        let existing = self.repository.list_projects().await?;
        if existing.len() >= self.limits.max_projects {
            return Err(ProjectServiceError::ProjectLimitExceeded(
                self.limits.max_projects,
            ));
        }

        if self
            .repository
            .find_project_by_name(&validated_name)
            .await?
            .is_some()
        {
            return Err(ProjectServiceError::DuplicateProjectName(
                validated_name.as_str().to_owned(),
            ));
        }

        Ok(self
            .repository
            .create_project(&validated_name, &validated_description)
            .await?)
    }

    /// Returns all projects ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the lookup fails.
    pub async fn list_projects(&self) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.repository.list_projects().await?)
    }

    /// Returns a project by id, tasks included.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the project does
    /// not exist.
    pub async fn find_project_by_id(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        Ok(self.repository.find_project_by_id(id).await?)
    }

    /// Adds a task to an existing project after validation.
    ///
    /// `deadline_text` uses the `YYYY-MM-DD` format; absent or blank input
    /// means no deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the project does
    /// not exist, [`ProjectServiceError::TaskLimitExceeded`] at capacity,
    /// and [`ProjectServiceError::Validation`] for length or deadline
    /// violations.
    pub async fn add_task_to_project(
        &self,
        project_id: ProjectId,
        title: &str,
        description: &str,
        deadline_text: Option<&str>,
    ) -> ProjectServiceResult<Task> {
        let project = self.repository.find_project_by_id(project_id).await?;

        if project.tasks().len() >= self.limits.max_tasks {
            return Err(ProjectServiceError::TaskLimitExceeded {
                name: project.name().as_str().to_owned(),
                limit: self.limits.max_tasks,
            });
        }

        let validated_title = TaskTitle::new(title)?;
        let validated_description = Description::new(description)?;
        let deadline = parse_deadline(deadline_text)?;

        Ok(self
            .repository
            .create_task(project_id, &validated_title, &validated_description, deadline)
            .await?)
    }

    /// Edits an existing project after validating business rules.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the project does
    /// not exist, [`ProjectServiceError::Validation`] on length violations,
    /// and [`ProjectServiceError::DuplicateProjectName`] when another
    /// project already uses the new name.
    pub async fn edit_project(
        &self,
        project_id: ProjectId,
        new_name: &str,
        new_description: &str,
    ) -> ProjectServiceResult<Project> {
        self.repository.find_project_by_id(project_id).await?;

        let validated_name = ProjectName::new(new_name)?;
        let validated_description = Description::new(new_description)?;

        if let Some(other) = self
            .repository
            .find_project_by_name(&validated_name)
            .await?
        {
            if other.id() != project_id {
                return Err(ProjectServiceError::DuplicateProjectName(
                    validated_name.as_str().to_owned(),
                ));
            }
        }

        Ok(self
            .repository
            .update_project(project_id, &validated_name, &validated_description)
            .await?)
    }

    /// Deletes a project and every task it owns.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the project does
    /// not exist.
    pub async fn delete_project(&self, project_id: ProjectId) -> ProjectServiceResult<()> {
        Ok(self.repository.delete_project(project_id).await?)
    }

    /// Changes a task's status after validating the status text against
    /// the closed `todo`/`doing`/`done` set.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Validation`] for an unknown status
    /// and [`ProjectServiceError::Repository`] when the project or task
    /// does not exist.
    pub async fn change_task_status(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        new_status_text: &str,
    ) -> ProjectServiceResult<Task> {
        let new_status = TaskStatus::try_from(new_status_text).map_err(DomainError::from)?;
        Ok(self
            .repository
            .update_task_status(project_id, task_id, new_status)
            .await?)
    }

    /// Edits every mutable task field after validation.
    ///
    /// The closing timestamp is derived from the status transition:
    /// entering `done` stamps the current time (an already-done task keeps
    /// its stamp), any other target status clears it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Validation`] for length, status, or
    /// deadline violations and [`ProjectServiceError::Repository`] when
    /// the project or task does not exist.
    pub async fn edit_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        title: &str,
        description: &str,
        status_text: &str,
        deadline_text: Option<&str>,
    ) -> ProjectServiceResult<Task> {
        let validated_title = TaskTitle::new(title)?;
        let validated_description = Description::new(description)?;
        let new_status = TaskStatus::try_from(status_text).map_err(DomainError::from)?;
        let deadline = parse_deadline(deadline_text)?;

        let project = self.repository.find_project_by_id(project_id).await?;
        let current = project
            .task(task_id)
            .ok_or(RepositoryError::task_not_found(task_id))?;

        let closed_at = match (current.status(), new_status) {
            (TaskStatus::Done, TaskStatus::Done) => current.closed_at(),
            (_, TaskStatus::Done) => Some(self.clock.utc()),
            _ => None,
        };

        let changes = TaskChanges {
            title: validated_title,
            description: validated_description,
            status: new_status,
            deadline,
            closed_at,
        };
        Ok(self
            .repository
            .update_task(project_id, task_id, changes)
            .await?)
    }

    /// Deletes a task from its project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the project or
    /// task does not exist.
    pub async fn delete_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> ProjectServiceResult<()> {
        Ok(self.repository.delete_task(project_id, task_id).await?)
    }

    /// Returns a project's tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the project does
    /// not exist.
    pub async fn list_tasks(&self, project_id: ProjectId) -> ProjectServiceResult<Vec<Task>> {
        let project = self.repository.find_project_by_id(project_id).await?;
        Ok(project.into_tasks())
    }

    /// Closes every task that is overdue at the time of the call and
    /// returns how many were closed.
    ///
    /// The sweep snapshots the overdue set once and then acts on that
    /// fixed set; it never re-queries mid-run, so the returned count is
    /// exactly the number of tasks it changed. Already-done tasks are
    /// excluded by the overdue filter, which makes the sweep idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the scan or one of
    /// the status updates fails.
    pub async fn autoclose_overdue_tasks(&self) -> ProjectServiceResult<usize> {
        let overdue = self.repository.find_overdue_tasks().await?;

        let mut closed = 0_usize;
        for task in overdue {
            self.repository
                .update_task_status(task.project_id(), task.id(), TaskStatus::Done)
                .await?;
            closed += 1;
        }

        tracing::debug!(closed, "auto-close sweep finished");
        Ok(closed)
    }
}
