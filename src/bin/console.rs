//! Interactive line-based console for the Gantt tracking engine.
//!
//! A thin collaborator over the project service: it parses commands,
//! invokes the service's public operations, and prints results. All
//! business rules live in the service; the console only rejects input it
//! cannot parse at all (unknown commands, wrong argument counts,
//! non-numeric ids). Service errors are printed without terminating the
//! interactive loop.
//!
//! Commands:
//!
//! ```text
//! create_project <name> <description>
//! add_task <project_id> <title> <description> [deadline:YYYY-MM-DD]
//! edit_project <project_id> <new_name> <new_description>
//! delete_project <project_id>
//! set_task_status <project_id> <task_id> <status>
//! edit_task <project_id> <task_id> <title> <description> <status> [deadline]
//! delete_task <project_id> <task_id>
//! list_tasks <project_id>
//! list_projects
//! help
//! exit
//! ```

#![expect(
    clippy::print_stdout,
    reason = "user-facing console output is this binary's purpose"
)]

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use gantt::config::{DatabaseConfig, Limits};
use gantt::project::adapters::postgres::PostgresProjectRepository;
use gantt::project::domain::{Project, ProjectId, Task, TaskId};
use gantt::project::services::{ProjectService, ProjectServiceError, ServiceLimits};
use mockable::DefaultClock;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service wired to the `PostgreSQL` repository.
type ConsoleService = ProjectService<PostgresProjectRepository<DefaultClock>, DefaultClock>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();

    let limits = Limits::from_env()?;
    let database = DatabaseConfig::from_env()?;

    let manager = ConnectionManager::<PgConnection>::new(database.url());
    let pool = Pool::builder().build(manager)?;
    let clock = Arc::new(DefaultClock);
    let repository = Arc::new(PostgresProjectRepository::new(pool, Arc::clone(&clock)));
    let service = ProjectService::new(
        repository,
        clock,
        ServiceLimits {
            max_projects: limits.max_projects,
            max_tasks: limits.max_tasks,
        },
    );

    tracing::info!("console connected");
    run_console(&service).await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Main interactive loop: read, tokenize, dispatch, print.
async fn run_console(service: &ConsoleService) -> Result<(), BoxError> {
    print_help();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            break;
        }
        let tokens = tokenize(&line);
        let Some((command, args)) = tokens.split_first() else {
            continue;
        };

        match run_command(service, command, args).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("Error: {err}"),
        }
    }
    Ok(())
}

/// Dispatches a single command. Returns `Ok(false)` to leave the loop.
async fn run_command(
    service: &ConsoleService,
    command: &str,
    args: &[String],
) -> Result<bool, ProjectServiceError> {
    match command {
        "create_project" => cmd_create_project(service, args).await?,
        "add_task" => cmd_add_task(service, args).await?,
        "edit_project" => cmd_edit_project(service, args).await?,
        "delete_project" => cmd_delete_project(service, args).await?,
        "set_task_status" => cmd_set_task_status(service, args).await?,
        "edit_task" => cmd_edit_task(service, args).await?,
        "delete_task" => cmd_delete_task(service, args).await?,
        "list_tasks" => cmd_list_tasks(service, args).await?,
        "list_projects" => cmd_list_projects(service, args).await?,
        "help" => print_help(),
        "exit" => return Ok(false),
        _ => println!("Invalid command. Type 'help' for a list of commands."),
    }
    Ok(true)
}

fn print_help() {
    println!("Available commands:");
    println!("  create_project <name> <description>");
    println!("  add_task <project_id> <title> <description> [deadline:YYYY-MM-DD]");
    println!("  edit_project <project_id> <new_name> <new_description>");
    println!("  delete_project <project_id>");
    println!("  set_task_status <project_id> <task_id> <status>");
    println!("  edit_task <project_id> <task_id> <title> <description> <status> [deadline]");
    println!("  delete_task <project_id> <task_id>");
    println!("  list_tasks <project_id>");
    println!("  list_projects");
    println!("  help");
    println!("  exit");
}

/// Parses a project id argument, reporting malformed input locally.
fn parse_project_id(text: &str) -> Option<ProjectId> {
    let Ok(value) = text.parse::<i32>() else {
        println!("Invalid project id '{text}'. Project id must be an integer.");
        return None;
    };
    Some(ProjectId::new(value))
}

/// Parses a task id argument, reporting malformed input locally.
fn parse_task_id(text: &str) -> Option<TaskId> {
    let Ok(value) = text.parse::<i32>() else {
        println!("Invalid task id '{text}'. Task id must be an integer.");
        return None;
    };
    Some(TaskId::new(value))
}

fn print_project_line(project: &Project) {
    println!(
        "  - id: {}, name: '{}', description: '{}', created: {}",
        project.id(),
        project.name(),
        project.description(),
        project.created_at().format("%Y-%m-%d"),
    );
}

fn print_task_line(task: &Task) {
    let deadline = task
        .deadline()
        .map_or_else(|| "none".to_owned(), |value| value.format("%Y-%m-%d").to_string());
    println!(
        "  - id: {}, title: '{}', status: {}, deadline: {}",
        task.id(),
        task.title(),
        task.status(),
        deadline,
    );
}

async fn cmd_create_project(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    let [name, description] = args else {
        println!("Invalid number of arguments.");
        return Ok(());
    };
    let project = service.create_project(name, description).await?;
    println!("Created project '{}' with id {}.", project.name(), project.id());
    Ok(())
}

async fn cmd_add_task(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    let (project_id_text, title, description, deadline) = match args {
        [project_id, title, description] => (project_id, title, description, None),
        [project_id, title, description, deadline] => {
            (project_id, title, description, Some(deadline.as_str()))
        }
        _ => {
            println!("Invalid number of arguments.");
            return Ok(());
        }
    };
    let Some(project_id) = parse_project_id(project_id_text) else {
        return Ok(());
    };
    let task = service
        .add_task_to_project(project_id, title, description, deadline)
        .await?;
    println!("Added task '{}' with id {}.", task.title(), task.id());
    Ok(())
}

async fn cmd_edit_project(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    let [project_id_text, new_name, new_description] = args else {
        println!("Invalid number of arguments.");
        return Ok(());
    };
    let Some(project_id) = parse_project_id(project_id_text) else {
        return Ok(());
    };
    let project = service
        .edit_project(project_id, new_name, new_description)
        .await?;
    println!("Updated project '{}' with id {}.", project.name(), project.id());
    Ok(())
}

async fn cmd_delete_project(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    let [project_id_text] = args else {
        println!("Invalid number of arguments.");
        return Ok(());
    };
    let Some(project_id) = parse_project_id(project_id_text) else {
        return Ok(());
    };
    service.delete_project(project_id).await?;
    println!("Deleted project {project_id}.");
    Ok(())
}

async fn cmd_set_task_status(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    let [project_id_text, task_id_text, status] = args else {
        println!("Invalid number of arguments.");
        return Ok(());
    };
    let Some(project_id) = parse_project_id(project_id_text) else {
        return Ok(());
    };
    let Some(task_id) = parse_task_id(task_id_text) else {
        return Ok(());
    };
    let task = service.change_task_status(project_id, task_id, status).await?;
    println!("Task {} is now {}.", task.id(), task.status());
    Ok(())
}

async fn cmd_edit_task(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    let (project_id_text, task_id_text, title, description, status, deadline) = match args {
        [project_id, task_id, title, description, status] => {
            (project_id, task_id, title, description, status, None)
        }
        [project_id, task_id, title, description, status, deadline] => (
            project_id,
            task_id,
            title,
            description,
            status,
            Some(deadline.as_str()),
        ),
        _ => {
            println!("Invalid number of arguments.");
            return Ok(());
        }
    };
    let Some(project_id) = parse_project_id(project_id_text) else {
        return Ok(());
    };
    let Some(task_id) = parse_task_id(task_id_text) else {
        return Ok(());
    };
    let task = service
        .edit_task(project_id, task_id, title, description, status, deadline)
        .await?;
    println!("Updated task '{}' with id {}.", task.title(), task.id());
    Ok(())
}

async fn cmd_delete_task(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    let [project_id_text, task_id_text] = args else {
        println!("Invalid number of arguments.");
        return Ok(());
    };
    let Some(project_id) = parse_project_id(project_id_text) else {
        return Ok(());
    };
    let Some(task_id) = parse_task_id(task_id_text) else {
        return Ok(());
    };
    service.delete_task(project_id, task_id).await?;
    println!("Deleted task {task_id}.");
    Ok(())
}

async fn cmd_list_tasks(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    let [project_id_text] = args else {
        println!("Invalid number of arguments.");
        return Ok(());
    };
    let Some(project_id) = parse_project_id(project_id_text) else {
        return Ok(());
    };
    let listed = service.list_tasks(project_id).await?;
    if listed.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    println!("Tasks:");
    for task in &listed {
        print_task_line(task);
    }
    Ok(())
}

async fn cmd_list_projects(
    service: &ConsoleService,
    args: &[String],
) -> Result<(), ProjectServiceError> {
    if !args.is_empty() {
        println!("Invalid number of arguments.");
        return Ok(());
    }
    let listed = service.list_projects().await?;
    if listed.is_empty() {
        println!("No projects found.");
        return Ok(());
    }
    println!("Projects:");
    for project in &listed {
        print_project_line(project);
    }
    Ok(())
}

/// Splits a command line into whitespace-separated tokens, grouping
/// single- or double-quoted segments into one token.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '\'' || ch == '"' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}
