//! Diesel row models for project and task persistence.

use super::schema::{projects, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: i32,
    /// Project name.
    pub name: String,
    /// Description, empty when absent.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = tasks)]
#[diesel(belongs_to(ProjectRow, foreign_key = project_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i32,
    /// Owning project identifier.
    pub project_id: i32,
    /// Task title.
    pub title: String,
    /// Description, empty when absent.
    pub description: String,
    /// Workflow status in canonical string form.
    pub status: String,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Closing timestamp, set while the task is done.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Insert model for project records; id and creation time are assigned by
/// the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project name.
    pub name: String,
    /// Description, empty when absent.
    pub description: String,
}

/// Insert model for task records; id, status default, and creation time
/// are assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning project identifier.
    pub project_id: i32,
    /// Task title.
    pub title: String,
    /// Description, empty when absent.
    pub description: String,
    /// Workflow status in canonical string form.
    pub status: String,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
}
