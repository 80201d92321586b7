//! In-memory implementation of the [`ProjectRepository`] port.
//!
//! The reference implementation: every operation is an atomic in-process
//! mutation with no I/O failure surface, which makes it the yardstick for
//! correctness testing. Every accessor returns a deep copy so that callers
//! own independent snapshots; the repository exclusively owns its records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{
        Description, Project, ProjectId, ProjectName, Task, TaskChanges, TaskId, TaskStatus,
        TaskTitle,
    },
    ports::{ProjectRepository, RepositoryError, RepositoryResult},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone)]
pub struct InMemoryProjectRepository<C> {
    state: Arc<RwLock<StoreState>>,
    clock: Arc<C>,
}

#[derive(Debug)]
struct StoreState {
    records: HashMap<i32, ProjectRecord>,
    next_project_id: i32,
}

/// Stored project plus its private task-id counter.
///
/// Task ids are unique within the owning project, not globally.
#[derive(Debug)]
struct ProjectRecord {
    project: Project,
    next_task_id: i32,
}

impl StoreState {
    fn record(&self, id: ProjectId) -> RepositoryResult<&ProjectRecord> {
        self.records
            .get(&id.value())
            .ok_or(RepositoryError::project_not_found(id))
    }

    fn record_mut(&mut self, id: ProjectId) -> RepositoryResult<&mut ProjectRecord> {
        self.records
            .get_mut(&id.value())
            .ok_or(RepositoryError::project_not_found(id))
    }
}

impl<C: Clock> InMemoryProjectRepository<C> {
    /// Creates an empty repository stamping timestamps from `clock`.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                records: HashMap::new(),
                next_project_id: 1,
            })),
            clock,
        }
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> ProjectRepository for InMemoryProjectRepository<C> {
    async fn create_project(
        &self,
        name: &ProjectName,
        description: &Description,
    ) -> RepositoryResult<Project> {
        let mut state = self.state.write().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let id = ProjectId::new(state.next_project_id);
        let project = Project::new(id, name.clone(), description.clone(), &*self.clock);
        state.records.insert(
            id.value(),
            ProjectRecord {
                project: project.clone(),
                next_task_id: 1,
            },
        );
        state.next_project_id += 1;
        Ok(project)
    }

    async fn list_projects(&self) -> RepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut projects: Vec<Project> = state
            .records
            .values()
            .map(|record| record.project.clone())
            .collect();
        projects.sort_by_key(|project| (project.created_at(), project.id()));
        Ok(projects)
    }

    async fn find_project_by_id(&self, id: ProjectId) -> RepositoryResult<Project> {
        let state = self.state.read().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.record(id)?.project.clone())
    }

    async fn find_project_by_name(
        &self,
        name: &ProjectName,
    ) -> RepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let project = state
            .records
            .values()
            .find(|record| record.project.name() == name)
            .map(|record| record.project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: ProjectId,
        new_name: &ProjectName,
        new_description: &Description,
    ) -> RepositoryResult<Project> {
        let mut state = self.state.write().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let record = state.record_mut(id)?;
        record
            .project
            .update_details(new_name.clone(), new_description.clone());
        Ok(record.project.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .records
            .remove(&id.value())
            .map(|_| ())
            .ok_or(RepositoryError::project_not_found(id))
    }

    async fn create_task(
        &self,
        project_id: ProjectId,
        title: &TaskTitle,
        description: &Description,
        deadline: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let record = state.record_mut(project_id)?;
        let task = Task::new(
            TaskId::new(record.next_task_id),
            project_id,
            title.clone(),
            description.clone(),
            deadline,
            &*self.clock,
        );
        record.next_task_id += 1;
        record.project.add_task(task.clone());
        Ok(task)
    }

    async fn update_task_status(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> RepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let record = state.record_mut(project_id)?;
        let task = record
            .project
            .task_mut(task_id)
            .ok_or(RepositoryError::task_not_found(task_id))?;
        task.set_status(new_status, &*self.clock);
        Ok(task.clone())
    }

    async fn update_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        changes: TaskChanges,
    ) -> RepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let record = state.record_mut(project_id)?;
        let task = record
            .project
            .task_mut(task_id)
            .ok_or(RepositoryError::task_not_found(task_id))?;
        task.apply_changes(changes);
        Ok(task.clone())
    }

    async fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let record = state.record_mut(project_id)?;
        record
            .project
            .remove_task(task_id)
            .map(|_| ())
            .ok_or(RepositoryError::task_not_found(task_id))
    }

    async fn find_overdue_tasks(&self) -> RepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let now = self.clock.utc();
        let mut overdue: Vec<Task> = state
            .records
            .values()
            .flat_map(|record| record.project.tasks())
            .filter(|task| task.is_overdue(now))
            .cloned()
            .collect();
        overdue.sort_by_key(|task| (task.project_id(), task.id()));
        Ok(overdue)
    }
}
