//! `PostgreSQL` repository implementation for project and task storage.
//!
//! Each mutating call commits immediately and returns the refreshed row
//! (via `RETURNING`), so callers always observe database-assigned values
//! such as ids and creation timestamps. Project fetches eager-load the
//! owned tasks to avoid per-task round trips. Cascade deletion of tasks
//! is delegated to the schema's `ON DELETE CASCADE`.

use super::{
    models::{NewProjectRow, NewTaskRow, ProjectRow, TaskRow},
    schema::{projects, tasks},
};
use crate::project::{
    domain::{
        Description, PersistedProjectData, PersistedTaskData, Project, ProjectId, ProjectName,
        Task, TaskChanges, TaskId, TaskStatus, TaskTitle,
    },
    ports::{ProjectRepository, RepositoryError, RepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::Clock;
use std::sync::Arc;

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed project repository.
#[derive(Clone)]
pub struct PostgresProjectRepository<C> {
    pool: ProjectPgPool,
    clock: Arc<C>,
}

impl<C: Clock + Send + Sync + 'static> PostgresProjectRepository<C> {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RepositoryError::persistence)?
    }
}

#[async_trait]
impl<C: Clock + Send + Sync + 'static> ProjectRepository for PostgresProjectRepository<C> {
    async fn create_project(
        &self,
        name: &ProjectName,
        description: &Description,
    ) -> RepositoryResult<Project> {
        let new_row = NewProjectRow {
            name: name.as_str().to_owned(),
            description: description.as_str().to_owned(),
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(projects::table)
                .values(&new_row)
                .returning(ProjectRow::as_returning())
                .get_result::<ProjectRow>(connection)
                .map_err(RepositoryError::persistence)?;
            row_to_project(row, Vec::new())
        })
        .await
    }

    async fn list_projects(&self) -> RepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let project_rows = projects::table
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(RepositoryError::persistence)?;
            let task_rows = TaskRow::belonging_to(&project_rows)
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(RepositoryError::persistence)?;

            task_rows
                .grouped_by(&project_rows)
                .into_iter()
                .zip(project_rows)
                .map(|(owned_tasks, row)| row_to_project(row, owned_tasks))
                .collect()
        })
        .await
    }

    async fn find_project_by_id(&self, id: ProjectId) -> RepositoryResult<Project> {
        self.run_blocking(move |connection| {
            let row = load_project_row(connection, id)?
                .ok_or(RepositoryError::project_not_found(id))?;
            let owned_tasks = load_project_tasks(connection, &row)?;
            row_to_project(row, owned_tasks)
        })
        .await
    }

    async fn find_project_by_name(
        &self,
        name: &ProjectName,
    ) -> RepositoryResult<Option<Project>> {
        let lookup_name = name.as_str().to_owned();

        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::name.eq(&lookup_name))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(RepositoryError::persistence)?;
            let Some(found) = row else {
                return Ok(None);
            };
            let owned_tasks = load_project_tasks(connection, &found)?;
            row_to_project(found, owned_tasks).map(Some)
        })
        .await
    }

    async fn update_project(
        &self,
        id: ProjectId,
        new_name: &ProjectName,
        new_description: &Description,
    ) -> RepositoryResult<Project> {
        let name_value = new_name.as_str().to_owned();
        let description_value = new_description.as_str().to_owned();

        self.run_blocking(move |connection| {
            let row = diesel::update(projects::table.find(id.value()))
                .set((
                    projects::name.eq(&name_value),
                    projects::description.eq(&description_value),
                ))
                .returning(ProjectRow::as_returning())
                .get_result::<ProjectRow>(connection)
                .optional()
                .map_err(RepositoryError::persistence)?
                .ok_or(RepositoryError::project_not_found(id))?;
            let owned_tasks = load_project_tasks(connection, &row)?;
            row_to_project(row, owned_tasks)
        })
        .await
    }

    async fn delete_project(&self, id: ProjectId) -> RepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(projects::table.find(id.value()))
                .execute(connection)
                .map_err(RepositoryError::persistence)?;
            if deleted == 0 {
                return Err(RepositoryError::project_not_found(id));
            }
            Ok(())
        })
        .await
    }

    async fn create_task(
        &self,
        project_id: ProjectId,
        title: &TaskTitle,
        description: &Description,
        deadline: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Task> {
        let new_row = NewTaskRow {
            project_id: project_id.value(),
            title: title.as_str().to_owned(),
            description: description.as_str().to_owned(),
            status: TaskStatus::Todo.as_str().to_owned(),
            deadline,
        };

        self.run_blocking(move |connection| {
            ensure_project_exists(connection, project_id)?;
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(RepositoryError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn update_task_status(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> RepositoryResult<Task> {
        let clock = Arc::clone(&self.clock);

        self.run_blocking(move |connection| {
            ensure_project_exists(connection, project_id)?;
            let row = load_task_row(connection, project_id, task_id)?
                .ok_or(RepositoryError::task_not_found(task_id))?;
            let mut task = row_to_task(row)?;
            task.set_status(new_status, &*clock);

            let updated = diesel::update(tasks::table.find(task_id.value()))
                .set((
                    tasks::status.eq(task.status().as_str()),
                    tasks::closed_at.eq(task.closed_at()),
                ))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(RepositoryError::persistence)?;
            row_to_task(updated)
        })
        .await
    }

    async fn update_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        changes: TaskChanges,
    ) -> RepositoryResult<Task> {
        self.run_blocking(move |connection| {
            ensure_project_exists(connection, project_id)?;
            let row = diesel::update(
                tasks::table
                    .filter(tasks::project_id.eq(project_id.value()))
                    .filter(tasks::id.eq(task_id.value())),
            )
            .set((
                tasks::title.eq(changes.title.as_str()),
                tasks::description.eq(changes.description.as_str()),
                tasks::status.eq(changes.status.as_str()),
                tasks::deadline.eq(changes.deadline),
                tasks::closed_at.eq(changes.closed_at),
            ))
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(connection)
            .optional()
            .map_err(RepositoryError::persistence)?
            .ok_or(RepositoryError::task_not_found(task_id))?;
            row_to_task(row)
        })
        .await
    }

    async fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> RepositoryResult<()> {
        self.run_blocking(move |connection| {
            ensure_project_exists(connection, project_id)?;
            let deleted = diesel::delete(
                tasks::table
                    .filter(tasks::project_id.eq(project_id.value()))
                    .filter(tasks::id.eq(task_id.value())),
            )
            .execute(connection)
            .map_err(RepositoryError::persistence)?;
            if deleted == 0 {
                return Err(RepositoryError::task_not_found(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_overdue_tasks(&self) -> RepositoryResult<Vec<Task>> {
        let now = self.clock.utc();

        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::deadline.is_not_null())
                .filter(tasks::deadline.assume_not_null().lt(now))
                .filter(tasks::status.ne(TaskStatus::Done.as_str()))
                .order((tasks::project_id.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(RepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn ensure_project_exists(
    connection: &mut PgConnection,
    id: ProjectId,
) -> RepositoryResult<()> {
    let exists = diesel::select(diesel::dsl::exists(projects::table.find(id.value())))
        .get_result::<bool>(connection)
        .map_err(RepositoryError::persistence)?;
    if exists {
        Ok(())
    } else {
        Err(RepositoryError::project_not_found(id))
    }
}

fn load_project_row(
    connection: &mut PgConnection,
    id: ProjectId,
) -> RepositoryResult<Option<ProjectRow>> {
    projects::table
        .find(id.value())
        .select(ProjectRow::as_select())
        .first::<ProjectRow>(connection)
        .optional()
        .map_err(RepositoryError::persistence)
}

fn load_project_tasks(
    connection: &mut PgConnection,
    row: &ProjectRow,
) -> RepositoryResult<Vec<TaskRow>> {
    TaskRow::belonging_to(row)
        .order(tasks::id.asc())
        .select(TaskRow::as_select())
        .load::<TaskRow>(connection)
        .map_err(RepositoryError::persistence)
}

fn load_task_row(
    connection: &mut PgConnection,
    project_id: ProjectId,
    task_id: TaskId,
) -> RepositoryResult<Option<TaskRow>> {
    tasks::table
        .filter(tasks::project_id.eq(project_id.value()))
        .filter(tasks::id.eq(task_id.value()))
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(RepositoryError::persistence)
}

fn row_to_project(row: ProjectRow, task_rows: Vec<TaskRow>) -> RepositoryResult<Project> {
    let ProjectRow {
        id,
        name,
        description,
        created_at,
    } = row;

    let owned_tasks = task_rows
        .into_iter()
        .map(row_to_task)
        .collect::<RepositoryResult<Vec<Task>>>()?;

    let data = PersistedProjectData {
        id: ProjectId::new(id),
        name: ProjectName::new(name).map_err(RepositoryError::persistence)?,
        description: Description::new(description).map_err(RepositoryError::persistence)?,
        created_at,
        tasks: owned_tasks,
    };
    Ok(Project::from_persisted(data))
}

fn row_to_task(row: TaskRow) -> RepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        title,
        description,
        status,
        deadline,
        created_at,
        closed_at,
    } = row;

    let parsed_status =
        TaskStatus::try_from(status.as_str()).map_err(RepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::new(id),
        project_id: ProjectId::new(project_id),
        title: TaskTitle::new(title).map_err(RepositoryError::persistence)?,
        description: Description::new(description).map_err(RepositoryError::persistence)?,
        status: parsed_status,
        deadline,
        created_at,
        closed_at,
    };
    Ok(Task::from_persisted(data))
}
