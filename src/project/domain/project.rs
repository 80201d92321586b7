//! Project aggregate root.

use super::{Description, ProjectId, ProjectName, Task, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A named container of tasks.
///
/// A project exclusively owns its tasks: they are created inside it, live
/// inside it, and are destroyed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    description: Description,
    created_at: DateTime<Utc>,
    tasks: Vec<Task>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted project name.
    pub name: ProjectName,
    /// Persisted description.
    pub description: Description,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted tasks in creation order.
    pub tasks: Vec<Task>,
}

impl Project {
    /// Creates a new empty project.
    #[must_use]
    pub fn new(
        id: ProjectId,
        name: ProjectName,
        description: Description,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_at: clock.utc(),
            tasks: Vec::new(),
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            created_at: data.created_at,
            tasks: data.tasks,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the project description.
    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the owned tasks in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consumes the project and returns its tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Replaces the mutable project details. Identity and creation time
    /// are immutable.
    pub fn update_details(&mut self, name: ProjectName, description: Description) {
        self.name = name;
        self.description = description;
    }

    /// Appends a task to the project.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Finds an owned task by id.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Finds an owned task by id for mutation.
    pub fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == task_id)
    }

    /// Removes an owned task by id, returning it when present.
    pub fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id() == task_id)?;
        Some(self.tasks.remove(position))
    }
}
