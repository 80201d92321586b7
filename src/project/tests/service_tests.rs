//! Service orchestration tests over the in-memory repository.

use std::sync::Arc;

use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{DomainError, Project, ProjectId, Task, TaskId, TaskStatus},
    ports::{EntityKind, RepositoryError},
    services::{ProjectService, ProjectServiceError, ServiceLimits},
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = ProjectService<InMemoryProjectRepository<DefaultClock>, DefaultClock>;

fn service_with_limits(max_projects: usize, max_tasks: usize) -> TestService {
    let clock = Arc::new(DefaultClock);
    let repository = Arc::new(InMemoryProjectRepository::new(Arc::clone(&clock)));
    ProjectService::new(
        repository,
        clock,
        ServiceLimits {
            max_projects,
            max_tasks,
        },
    )
}

#[fixture]
fn service() -> TestService {
    service_with_limits(10, 10)
}

/// Formats today plus `offset_days` as deadline text.
fn date_text(offset_days: i64) -> String {
    (Utc::now() + Duration::days(offset_days))
        .format("%Y-%m-%d")
        .to_string()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_project_assigns_sequential_ids_and_lists_in_order(service: TestService) {
    let first = service
        .create_project("Launch", "Q1 launch")
        .await
        .expect("first project");
    let second = service
        .create_project("Migration", "")
        .await
        .expect("second project");

    assert_eq!(first.id(), ProjectId::new(1));
    assert_eq!(second.id(), ProjectId::new(2));

    let listed = service.list_projects().await.expect("listing succeeds");
    let ids: Vec<ProjectId> = listed.iter().map(|project| project.id()).collect();
    assert_eq!(ids, [ProjectId::new(1), ProjectId::new(2)]);
    assert!(listed.iter().map(Project::created_at).is_sorted());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_project_rejects_name_over_limit(service: TestService) {
    let result = service.create_project(&"x".repeat(31), "").await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(
            DomainError::ProjectNameTooLong(31)
        ))
    ));
    assert!(
        service
            .list_projects()
            .await
            .expect("listing succeeds")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_project_rejects_description_over_limit(service: TestService) {
    let result = service.create_project("Launch", &"d".repeat(151)).await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(
            DomainError::DescriptionTooLong(151)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_project_rejects_duplicate_name(service: TestService) {
    service
        .create_project("Launch", "Q1 launch")
        .await
        .expect("first project");

    let result = service.create_project("Launch", "another").await;

    let Err(ProjectServiceError::DuplicateProjectName(name)) = result else {
        panic!("expected duplicate-name rejection, got {result:?}");
    };
    assert_eq!(name, "Launch");
}

#[tokio::test(flavor = "multi_thread")]
async fn project_limit_allows_reaching_but_not_exceeding_maximum() {
    let service = service_with_limits(2, 10);

    service.create_project("One", "").await.expect("first fits");
    service.create_project("Two", "").await.expect("second still fits");

    let result = service.create_project("Three", "").await;
    assert!(matches!(
        result,
        Err(ProjectServiceError::ProjectLimitExceeded(2))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_project_rejects_other_projects_name(service: TestService) {
    let launch = service
        .create_project("Launch", "")
        .await
        .expect("first project");
    service
        .create_project("Migration", "")
        .await
        .expect("second project");

    let result = service.edit_project(launch.id(), "Migration", "").await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::DuplicateProjectName(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_project_accepts_keeping_its_own_name(service: TestService) {
    let launch = service
        .create_project("Launch", "Q1 launch")
        .await
        .expect("project created");

    let edited = service
        .edit_project(launch.id(), "Launch", "now Q2")
        .await
        .expect("edit succeeds");

    assert_eq!(edited.name().as_str(), "Launch");
    assert_eq!(edited.description().as_str(), "now Q2");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_project_propagates_missing_project(service: TestService) {
    let result = service.edit_project(ProjectId::new(42), "Ghost", "").await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Repository(RepositoryError::NotFound {
            kind: EntityKind::Project,
            id: 42,
        }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_project_with_unchanged_fields_preserves_the_entity(service: TestService) {
    let created = service
        .create_project("Launch", "Q1 launch")
        .await
        .expect("project created");

    let edited = service
        .edit_project(created.id(), created.name().as_str(), created.description().as_str())
        .await
        .expect("edit succeeds");

    assert_eq!(edited, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_task_defaults_to_todo_with_parsed_deadline(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");

    let task = service
        .add_task_to_project(project.id(), "Draft plan", "", Some(&date_text(7)))
        .await
        .expect("task created");

    assert_eq!(task.id(), TaskId::new(1));
    assert_eq!(task.status(), TaskStatus::Todo);
    assert!(task.deadline().is_some());
    assert_eq!(task.closed_at(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_task_rejects_malformed_deadline(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");

    let result = service
        .add_task_to_project(project.id(), "Draft plan", "", Some("tomorrow"))
        .await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(
            DomainError::InvalidDeadline(_)
        ))
    ));
    assert!(
        service
            .list_tasks(project.id())
            .await
            .expect("listing succeeds")
            .is_empty()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn add_task_enforces_per_project_limit() {
    let service = service_with_limits(10, 2);
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");

    service
        .add_task_to_project(project.id(), "One", "", None)
        .await
        .expect("first fits");
    service
        .add_task_to_project(project.id(), "Two", "", None)
        .await
        .expect("second still fits");

    let result = service
        .add_task_to_project(project.id(), "Three", "", None)
        .await;
    assert!(matches!(
        result,
        Err(ProjectServiceError::TaskLimitExceeded { limit: 2, .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_task_propagates_missing_project(service: TestService) {
    let result = service
        .add_task_to_project(ProjectId::new(9), "Draft plan", "", None)
        .await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Repository(RepositoryError::NotFound {
            kind: EntityKind::Project,
            id: 9,
        }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_ids_are_scoped_per_project(service: TestService) {
    let launch = service
        .create_project("Launch", "")
        .await
        .expect("first project");
    let migration = service
        .create_project("Migration", "")
        .await
        .expect("second project");

    let first = service
        .add_task_to_project(launch.id(), "Draft plan", "", None)
        .await
        .expect("task in first project");
    let second = service
        .add_task_to_project(migration.id(), "Schema diff", "", None)
        .await
        .expect("task in second project");

    assert_eq!(first.id(), TaskId::new(1));
    assert_eq!(second.id(), TaskId::new(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_task_status_rejects_unknown_and_leaves_status_unchanged(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");
    let task = service
        .add_task_to_project(project.id(), "Draft plan", "", None)
        .await
        .expect("task created");

    let result = service
        .change_task_status(project.id(), task.id(), "archived")
        .await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(DomainError::UnknownStatus(_)))
    ));
    let stored = service
        .list_tasks(project.id())
        .await
        .expect("listing succeeds");
    assert_eq!(stored.first().map(Task::status), Some(TaskStatus::Todo));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_task_status_maintains_closing_stamp(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");
    let task = service
        .add_task_to_project(project.id(), "Draft plan", "", None)
        .await
        .expect("task created");

    let closed = service
        .change_task_status(project.id(), task.id(), "done")
        .await
        .expect("close succeeds");
    assert_eq!(closed.status(), TaskStatus::Done);
    assert!(closed.closed_at().is_some());

    let reopened = service
        .change_task_status(project.id(), task.id(), "todo")
        .await
        .expect("reopen succeeds");
    assert_eq!(reopened.status(), TaskStatus::Todo);
    assert_eq!(reopened.closed_at(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_task_with_unchanged_fields_preserves_the_entity(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");
    let deadline_text = date_text(7);
    let task = service
        .add_task_to_project(project.id(), "Draft plan", "outline", Some(&deadline_text))
        .await
        .expect("task created");

    let edited = service
        .edit_task(
            project.id(),
            task.id(),
            task.title().as_str(),
            task.description().as_str(),
            task.status().as_str(),
            Some(&deadline_text),
        )
        .await
        .expect("edit succeeds");

    assert_eq!(edited, task);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_task_reopening_clears_closing_stamp(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");
    let task = service
        .add_task_to_project(project.id(), "Draft plan", "", None)
        .await
        .expect("task created");
    service
        .change_task_status(project.id(), task.id(), "done")
        .await
        .expect("close succeeds");

    let reopened = service
        .edit_task(project.id(), task.id(), "Draft plan", "", "doing", None)
        .await
        .expect("edit succeeds");

    assert_eq!(reopened.status(), TaskStatus::Doing);
    assert_eq!(reopened.closed_at(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_task_removes_only_that_task(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");
    let first = service
        .add_task_to_project(project.id(), "Draft plan", "", None)
        .await
        .expect("first task");
    let second = service
        .add_task_to_project(project.id(), "Review plan", "", None)
        .await
        .expect("second task");

    service
        .delete_task(project.id(), first.id())
        .await
        .expect("delete succeeds");

    let remaining = service
        .list_tasks(project.id())
        .await
        .expect("listing succeeds");
    let remaining_ids: Vec<TaskId> = remaining.iter().map(Task::id).collect();
    assert_eq!(remaining_ids, [second.id()]);

    let repeat = service.delete_task(project.id(), first.id()).await;
    assert!(matches!(
        repeat,
        Err(ProjectServiceError::Repository(RepositoryError::NotFound {
            kind: EntityKind::Task,
            ..
        }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_tasks_from_the_overdue_scan(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");
    service
        .add_task_to_project(project.id(), "Draft plan", "", Some(&date_text(-1)))
        .await
        .expect("overdue task created");

    service
        .delete_project(project.id())
        .await
        .expect("delete succeeds");

    let closed = service
        .autoclose_overdue_tasks()
        .await
        .expect("sweep succeeds");
    assert_eq!(closed, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn autoclose_closes_every_overdue_task_once(service: TestService) {
    let project = service
        .create_project("Launch", "")
        .await
        .expect("project created");
    let stale = service
        .add_task_to_project(project.id(), "Draft plan", "", Some(&date_text(-1)))
        .await
        .expect("overdue task");
    service
        .change_task_status(project.id(), stale.id(), "doing")
        .await
        .expect("status change succeeds");
    service
        .add_task_to_project(project.id(), "Review plan", "", Some(&date_text(-2)))
        .await
        .expect("second overdue task");
    service
        .add_task_to_project(project.id(), "Ship", "", Some(&date_text(30)))
        .await
        .expect("future task");

    let closed = service
        .autoclose_overdue_tasks()
        .await
        .expect("sweep succeeds");
    assert_eq!(closed, 2);

    let tasks = service
        .list_tasks(project.id())
        .await
        .expect("listing succeeds");
    let done_count = tasks
        .iter()
        .filter(|task| task.status() == TaskStatus::Done && task.closed_at().is_some())
        .count();
    assert_eq!(done_count, 2);

    let repeat = service
        .autoclose_overdue_tasks()
        .await
        .expect("second sweep succeeds");
    assert_eq!(repeat, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn launch_scenario_closes_the_seeded_task(service: TestService) {
    let project = service
        .create_project("Launch", "Q1 launch")
        .await
        .expect("project created");
    assert_eq!(project.id(), ProjectId::new(1));

    let task = service
        .add_task_to_project(project.id(), "Draft plan", "", Some("2020-01-01"))
        .await
        .expect("task created");
    assert_eq!(task.id(), TaskId::new(1));
    assert_eq!(task.status(), TaskStatus::Todo);

    let closed = service
        .autoclose_overdue_tasks()
        .await
        .expect("sweep succeeds");
    assert_eq!(closed, 1);

    let tasks = service
        .list_tasks(project.id())
        .await
        .expect("listing succeeds");
    assert_eq!(
        tasks.first().map(Task::status),
        Some(TaskStatus::Done)
    );
}
