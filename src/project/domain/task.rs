//! Task entity and status lifecycle types.

use super::{Description, DomainError, ParseTaskStatusError, ProjectId, TaskId, TaskTitle};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task workflow status.
///
/// A closed set of exactly three values. Untrusted input strings are
/// validated against this set at the service boundary; the enum itself
/// cannot hold anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is in progress.
    Doing,
    /// Work is finished; the task is closed.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses an optional `YYYY-MM-DD` deadline into a UTC timestamp at
/// midnight.
///
/// Absent or blank input is a valid "no deadline" and yields `None`.
///
/// # Errors
///
/// Returns [`DomainError::InvalidDeadline`] when the text is not a valid
/// calendar date.
pub fn parse_deadline(text: Option<&str>) -> Result<Option<DateTime<Utc>>, DomainError> {
    let Some(raw) = text else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDeadline(raw.to_owned()))?;
    Ok(Some(date.and_time(NaiveTime::MIN).and_utc()))
}

/// A unit of work owned by exactly one project for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: TaskTitle,
    description: Description,
    status: TaskStatus,
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Identifier of the owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Description,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted closing timestamp, if the task is closed.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Full-edit payload applied verbatim by a repository's task update.
///
/// The service decides every field, including `closed_at`; repositories
/// apply the changes without interpreting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    /// New title.
    pub title: TaskTitle,
    /// New description.
    pub description: Description,
    /// New workflow status.
    pub status: TaskStatus,
    /// New deadline, or `None` to remove it.
    pub deadline: Option<DateTime<Utc>>,
    /// New closing timestamp, or `None` for an open task.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new open task with status [`TaskStatus::Todo`].
    #[must_use]
    pub fn new(
        id: TaskId,
        project_id: ProjectId,
        title: TaskTitle,
        description: Description,
        deadline: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            project_id,
            title,
            description,
            status: TaskStatus::Todo,
            deadline,
            created_at: clock.utc(),
            closed_at: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            deadline: data.deadline,
            created_at: data.created_at,
            closed_at: data.closed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the identifier of the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the deadline, if one is set.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the closing timestamp, if the task is closed.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Moves the task to a new status, maintaining the `closed_at` stamp.
    ///
    /// Entering [`TaskStatus::Done`] records the closing time; leaving it
    /// clears the stamp. A task already done keeps its original stamp.
    pub fn set_status(&mut self, new_status: TaskStatus, clock: &impl Clock) {
        match (self.status, new_status) {
            (TaskStatus::Done, TaskStatus::Done) => {}
            (_, TaskStatus::Done) => self.closed_at = Some(clock.utc()),
            (TaskStatus::Done, _) => self.closed_at = None,
            _ => {}
        }
        self.status = new_status;
    }

    /// Applies a full edit verbatim.
    pub fn apply_changes(&mut self, changes: TaskChanges) {
        self.title = changes.title;
        self.description = changes.description;
        self.status = changes.status;
        self.deadline = changes.deadline;
        self.closed_at = changes.closed_at;
    }

    /// Returns `true` when the task has a deadline in the past and is not
    /// yet done.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.deadline.is_some_and(|deadline| deadline < now)
    }
}
