//! Tests proving that validation failures never reach the repository.
//!
//! The mock repository carries no expectations unless a call is part of
//! the scenario; any unexpected repository call panics the test.

use std::sync::Arc;

use crate::project::{
    domain::{
        Description, DomainError, Project, ProjectId, ProjectName, Task, TaskChanges, TaskId,
        TaskStatus, TaskTitle,
    },
    ports::{ProjectRepository, RepositoryResult},
    services::{ProjectService, ProjectServiceError, ServiceLimits},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use mockall::mock;

mock! {
    pub Repo {}

    #[async_trait]
    impl ProjectRepository for Repo {
        async fn create_project(
            &self,
            name: &ProjectName,
            description: &Description,
        ) -> RepositoryResult<Project>;
        async fn list_projects(&self) -> RepositoryResult<Vec<Project>>;
        async fn find_project_by_id(&self, id: ProjectId) -> RepositoryResult<Project>;
        async fn find_project_by_name(
            &self,
            name: &ProjectName,
        ) -> RepositoryResult<Option<Project>>;
        async fn update_project(
            &self,
            id: ProjectId,
            new_name: &ProjectName,
            new_description: &Description,
        ) -> RepositoryResult<Project>;
        async fn delete_project(&self, id: ProjectId) -> RepositoryResult<()>;
        async fn create_task(
            &self,
            project_id: ProjectId,
            title: &TaskTitle,
            description: &Description,
            deadline: Option<DateTime<Utc>>,
        ) -> RepositoryResult<Task>;
        async fn update_task_status(
            &self,
            project_id: ProjectId,
            task_id: TaskId,
            new_status: TaskStatus,
        ) -> RepositoryResult<Task>;
        async fn update_task(
            &self,
            project_id: ProjectId,
            task_id: TaskId,
            changes: TaskChanges,
        ) -> RepositoryResult<Task>;
        async fn delete_task(&self, project_id: ProjectId, task_id: TaskId)
        -> RepositoryResult<()>;
        async fn find_overdue_tasks(&self) -> RepositoryResult<Vec<Task>>;
    }
}

fn service_over(repository: MockRepo) -> ProjectService<MockRepo, DefaultClock> {
    ProjectService::new(
        Arc::new(repository),
        Arc::new(DefaultClock),
        ServiceLimits {
            max_projects: 5,
            max_tasks: 5,
        },
    )
}

fn empty_project(id: ProjectId) -> Project {
    Project::new(
        id,
        ProjectName::new("Launch").expect("valid name"),
        Description::new("").expect("valid description"),
        &DefaultClock,
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_project_name_fails_before_any_repository_call() {
    let service = service_over(MockRepo::new());

    let result = service.create_project(&"x".repeat(31), "").await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(
            DomainError::ProjectNameTooLong(31)
        ))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_description_fails_before_any_repository_call() {
    let service = service_over(MockRepo::new());

    let result = service.create_project("Launch", &"d".repeat(151)).await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(
            DomainError::DescriptionTooLong(151)
        ))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_status_fails_before_any_repository_call() {
    let service = service_over(MockRepo::new());

    let result = service
        .change_task_status(ProjectId::new(1), TaskId::new(1), "archived")
        .await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(DomainError::UnknownStatus(_)))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_task_with_unknown_status_fails_before_any_repository_call() {
    let service = service_over(MockRepo::new());

    let result = service
        .edit_task(ProjectId::new(1), TaskId::new(1), "Draft", "", "paused", None)
        .await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(DomainError::UnknownStatus(_)))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_deadline_fails_before_task_creation() {
    let mut repository = MockRepo::new();
    repository
        .expect_find_project_by_id()
        .returning(|id| Ok(empty_project(id)));
    let service = service_over(repository);

    let result = service
        .add_task_to_project(ProjectId::new(1), "Draft plan", "", Some("soon"))
        .await;

    assert!(matches!(
        result,
        Err(ProjectServiceError::Validation(
            DomainError::InvalidDeadline(_)
        ))
    ));
}
